use serde_json::Value;

use crate::{Schema, TypeDefinition, TypeRef};

/// Why an input value doesn't match its type. `path` holds the list indices leading to the
/// faulty item.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct InputValueError {
    pub path: Vec<usize>,
    pub message: String,
}

impl InputValueError {
    fn new(message: impl Into<String>) -> Self {
        InputValueError {
            path: Vec::new(),
            message: message.into(),
        }
    }

    fn at(mut self, index: usize) -> Self {
        self.path.insert(0, index);
        self
    }
}

impl Schema {
    /// Coerces a JSON input value, a variable value or a default value, to `ty` following the
    /// GraphQL input coercion rules: a single item is accepted where a list is expected, and
    /// null is only refused by non-null types.
    pub fn coerce_input_value(&self, ty: &TypeRef, value: &Value) -> Result<Value, InputValueError> {
        match ty {
            TypeRef::NonNull(inner) => {
                if value.is_null() {
                    return Err(InputValueError::new(format!(
                        "Expected non-nullable type '{ty}' not to be null."
                    )));
                }
                self.coerce_input_value(inner, value)
            }
            _ if value.is_null() => Ok(Value::Null),
            TypeRef::List(inner) => match value {
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.coerce_input_value(inner, item).map_err(|err| err.at(index)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                _ => Ok(Value::Array(vec![self.coerce_input_value(inner, value)?])),
            },
            TypeRef::Named(name) => match self.type_definition(name) {
                Some(TypeDefinition::Scalar(scalar)) => scalar.kind.coerce_input(value).map_err(InputValueError::new),
                Some(TypeDefinition::Enum(enum_definition)) => {
                    enum_definition.coerce_input(value).map_err(InputValueError::new)
                }
                Some(TypeDefinition::Object(_)) | None => Err(InputValueError::new(format!(
                    "Expected type '{name}' to be an input type."
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{Enum, Field, Object};

    use super::*;

    fn schema() -> Schema {
        Schema::build(Object::new("Query").field(Field::new("a", "Int")))
            .register_enum(Enum::new("Color").values(["RED", "GREEN"]))
            .finish()
            .unwrap()
    }

    fn ty(s: &str) -> TypeRef {
        s.parse().unwrap()
    }

    #[test]
    fn single_values_are_wrapped_in_lists() {
        let schema = schema();
        assert_eq!(schema.coerce_input_value(&ty("[Int]"), &json!(1)), Ok(json!([1])));
        assert_eq!(schema.coerce_input_value(&ty("[Int]"), &json!(null)), Ok(json!(null)));
        assert_eq!(
            schema.coerce_input_value(&ty("[[ID!]]"), &json!([[1, "2"]])),
            Ok(json!([["1", "2"]]))
        );
    }

    #[test]
    fn errors_point_to_the_faulty_item() {
        let schema = schema();
        let err = schema
            .coerce_input_value(&ty("[[Int!]]"), &json!([[1], [2, null]]))
            .unwrap_err();
        assert_eq!(err.path, vec![1, 1]);
        assert_eq!(err.message, "Expected non-nullable type 'Int!' not to be null.");
    }

    #[test]
    fn enums() {
        let schema = schema();
        assert_eq!(schema.coerce_input_value(&ty("Color!"), &json!("RED")), Ok(json!("RED")));
        assert_eq!(
            schema.coerce_input_value(&ty("Color"), &json!("BLUE")).unwrap_err().message,
            "Value 'BLUE' does not exist in 'Color' enum."
        );
        assert!(schema.coerce_input_value(&ty("Query"), &json!({})).is_err());
    }
}
