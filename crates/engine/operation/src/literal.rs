use async_graphql_parser::types::{BaseType, Type};
use async_graphql_value::Value;
use schema::{Schema, TypeDefinition, TypeRef};
use serde_json::{Map, Value as JsonValue};

/// A literal, or part of it, doesn't match the type expected at its position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LiteralError {
    pub expected: TypeRef,
    pub found: String,
}

impl LiteralError {
    fn new(expected: &TypeRef, found: &Value) -> Self {
        LiteralError {
            expected: expected.clone(),
            found: found.to_string(),
        }
    }
}

impl std::fmt::Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Expected value of type '{}', found {}.", self.expected, self.found)
    }
}

pub(crate) fn type_ref(ty: &Type) -> TypeRef {
    let inner = match &ty.base {
        BaseType::Named(name) => TypeRef::Named(name.to_string()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };
    if ty.nullable {
        inner
    } else {
        TypeRef::NonNull(Box::new(inner))
    }
}

/// Converts a literal of the operation into a JSON value of type `ty`.
///
/// Variables are looked up in `variables`. Without variables, during validation, they're
/// accepted as is. `None` means the value is absent: an unprovided variable.
pub(crate) fn coerce_literal(
    schema: &Schema,
    ty: &TypeRef,
    value: &Value,
    variables: Option<&Map<String, JsonValue>>,
) -> Result<Option<JsonValue>, LiteralError> {
    if let Value::Variable(name) = value {
        return Ok(match variables {
            Some(variables) => variables.get(name.as_str()).cloned(),
            None => None,
        });
    }

    match ty {
        TypeRef::NonNull(inner) => {
            if matches!(value, Value::Null) {
                return Err(LiteralError::new(ty, value));
            }
            coerce_literal(schema, inner, value, variables)
        }
        _ if matches!(value, Value::Null) => Ok(Some(JsonValue::Null)),
        TypeRef::List(inner) => match value {
            Value::List(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    let item = coerce_literal(schema, inner, item, variables)?;
                    list.push(item.unwrap_or_default());
                }
                Ok(Some(JsonValue::Array(list)))
            }
            _ => Ok(coerce_literal(schema, inner, value, variables)?.map(|item| JsonValue::Array(vec![item]))),
        },
        TypeRef::Named(name) => match schema.type_definition(name) {
            Some(TypeDefinition::Enum(definition)) => match value {
                Value::Enum(name) if definition.value(name.as_str()).is_some() => {
                    Ok(Some(JsonValue::String(name.to_string())))
                }
                _ => Err(LiteralError::new(ty, value)),
            },
            Some(TypeDefinition::Scalar(scalar)) => {
                let json = match scalar.kind {
                    schema::ScalarKind::Custom => literal_to_json(value, variables),
                    _ => scalar_literal_to_json(value),
                }
                .ok_or_else(|| LiteralError::new(ty, value))?;
                scalar
                    .kind
                    .coerce_input(&json)
                    .map(Some)
                    .map_err(|_| LiteralError::new(ty, value))
            }
            Some(TypeDefinition::Object(_)) | None => Err(LiteralError::new(ty, value)),
        },
    }
}

fn scalar_literal_to_json(value: &Value) -> Option<JsonValue> {
    match value {
        Value::Number(n) => Some(JsonValue::Number(n.clone())),
        Value::String(s) => Some(JsonValue::String(s.clone())),
        Value::Boolean(b) => Some(JsonValue::Bool(*b)),
        _ => None,
    }
}

/// Custom scalars accept any literal.
fn literal_to_json(value: &Value, variables: Option<&Map<String, JsonValue>>) -> Option<JsonValue> {
    Some(match value {
        Value::Variable(name) => variables
            .and_then(|variables| variables.get(name.as_str()).cloned())
            .unwrap_or_default(),
        Value::Null => JsonValue::Null,
        Value::Number(n) => JsonValue::Number(n.clone()),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Enum(name) => JsonValue::String(name.to_string()),
        Value::List(items) => items
            .iter()
            .map(|item| literal_to_json(item, variables))
            .collect::<Option<Vec<_>>>()
            .map(JsonValue::Array)?,
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| Some((key.to_string(), literal_to_json(value, variables)?)))
            .collect::<Option<Map<_, _>>>()
            .map(JsonValue::Object)?,
        Value::Binary(_) => return None,
    })
}
