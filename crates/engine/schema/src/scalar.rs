use serde_json::{Number, Value};

use crate::UPLOAD_PLACEHOLDER_PREFIX;

/// How values of a scalar type are coerced, in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::AsRefStr, strum::Display)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Boolean,
    #[strum(serialize = "ID")]
    Id,
    Upload,
    /// Scalars registered by the user, values are passed through untouched.
    #[strum(disabled)]
    Custom,
}

impl ScalarKind {
    pub const BUILTINS: [ScalarKind; 5] = [
        ScalarKind::String,
        ScalarKind::Int,
        ScalarKind::Float,
        ScalarKind::Boolean,
        ScalarKind::Id,
    ];

    /// Converts a resolved value into the response representation of the scalar.
    pub fn coerce_output(self, value: &Value) -> Result<Value, String> {
        match self {
            ScalarKind::String => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                _ => Err(format!("String cannot represent value: {}", inspect(value))),
            },
            ScalarKind::Int => {
                let int = match value {
                    Value::Bool(b) => Some(i64::from(*b)),
                    Value::Number(n) => as_integer(n),
                    Value::String(s) => s.parse::<f64>().ok().and_then(integral),
                    _ => None,
                };
                match int {
                    Some(int) => i32::try_from(int).map(Value::from).map_err(|_| {
                        format!(
                            "Int cannot represent non 32-bit signed integer value: {}",
                            inspect(value)
                        )
                    }),
                    None => Err(format!("Int cannot represent non-integer value: {}", inspect(value))),
                }
            }
            ScalarKind::Float => {
                let float = match value {
                    Value::Bool(b) => Some(f64::from(u8::from(*b))),
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.parse::<f64>().ok(),
                    _ => None,
                };
                float
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("Float cannot represent non numeric value: {}", inspect(value)))
            }
            ScalarKind::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => {
                    Ok(Value::Bool(n.as_f64() != Some(0.0)))
                }
                _ => Err(format!(
                    "Boolean cannot represent a non boolean value: {}",
                    inspect(value)
                )),
            },
            ScalarKind::Id => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) if as_integer(n).is_some() => Ok(Value::String(n.to_string())),
                _ => Err(format!("ID cannot represent value: {}", inspect(value))),
            },
            ScalarKind::Upload => Err("Upload cannot be used as an output type".to_string()),
            ScalarKind::Custom => Ok(value.clone()),
        }
    }

    /// Validates a variable value or a literal converted to JSON.
    pub fn coerce_input(self, value: &Value) -> Result<Value, String> {
        match self {
            ScalarKind::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(format!("String cannot represent a non string value: {}", inspect(value))),
            },
            ScalarKind::Int => {
                let Value::Number(n) = value else {
                    return Err(format!("Int cannot represent non-integer value: {}", inspect(value)));
                };
                let Some(int) = as_integer(n) else {
                    return Err(format!("Int cannot represent non-integer value: {}", inspect(value)));
                };
                i32::try_from(int).map(Value::from).map_err(|_| {
                    format!(
                        "Int cannot represent non 32-bit signed integer value: {}",
                        inspect(value)
                    )
                })
            }
            ScalarKind::Float => match value {
                Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => Ok(value.clone()),
                _ => Err(format!("Float cannot represent non numeric value: {}", inspect(value))),
            },
            ScalarKind::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                _ => Err(format!(
                    "Boolean cannot represent a non boolean value: {}",
                    inspect(value)
                )),
            },
            ScalarKind::Id => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) if as_integer(n).is_some() => Ok(Value::String(n.to_string())),
                _ => Err(format!("ID cannot represent value: {}", inspect(value))),
            },
            ScalarKind::Upload => match value {
                Value::String(s) if s.starts_with(UPLOAD_PLACEHOLDER_PREFIX) => Ok(value.clone()),
                _ => Err(format!("Upload cannot represent a non upload value: {}", inspect(value))),
            },
            ScalarKind::Custom => Ok(value.clone()),
        }
    }
}

fn as_integer(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| n.as_f64().and_then(integral))
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

/// Short rendering of a value for error messages.
pub fn inspect(value: &Value) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn int_output() {
        assert_eq!(ScalarKind::Int.coerce_output(&json!(3)), Ok(json!(3)));
        assert_eq!(ScalarKind::Int.coerce_output(&json!(3.0)), Ok(json!(3)));
        assert_eq!(ScalarKind::Int.coerce_output(&json!("12")), Ok(json!(12)));
        assert_eq!(ScalarKind::Int.coerce_output(&json!(true)), Ok(json!(1)));
        assert_eq!(
            ScalarKind::Int.coerce_output(&json!(1.5)),
            Err("Int cannot represent non-integer value: 1.5".to_string())
        );
        assert_eq!(
            ScalarKind::Int.coerce_output(&json!(4_294_967_296_i64)),
            Err("Int cannot represent non 32-bit signed integer value: 4294967296".to_string())
        );
    }

    #[test]
    fn string_and_id_output() {
        assert_eq!(ScalarKind::String.coerce_output(&json!(1)), Ok(json!("1")));
        assert_eq!(ScalarKind::String.coerce_output(&json!(false)), Ok(json!("false")));
        assert!(ScalarKind::String.coerce_output(&json!({"a": 1})).is_err());
        assert_eq!(ScalarKind::Id.coerce_output(&json!(7)), Ok(json!("7")));
        assert!(ScalarKind::Id.coerce_output(&json!(7.5)).is_err());
    }

    #[test]
    fn inputs_are_strict() {
        assert!(ScalarKind::String.coerce_input(&json!(1)).is_err());
        assert!(ScalarKind::Int.coerce_input(&json!("1")).is_err());
        assert_eq!(ScalarKind::Float.coerce_input(&json!(1)), Ok(json!(1)));
        assert_eq!(ScalarKind::Id.coerce_input(&json!(1)), Ok(json!("1")));
        assert!(ScalarKind::Boolean.coerce_input(&json!(0)).is_err());
        assert!(ScalarKind::Upload.coerce_input(&json!("file.txt")).is_err());
        assert!(ScalarKind::Upload
            .coerce_input(&json!(format!("{UPLOAD_PLACEHOLDER_PREFIX}0")))
            .is_ok());
    }

    #[test]
    fn names() {
        assert_eq!("ID".parse::<ScalarKind>(), Ok(ScalarKind::Id));
        assert_eq!(ScalarKind::Boolean.as_ref(), "Boolean");
        assert!("Custom".parse::<ScalarKind>().is_err());
    }
}
