use async_graphql_parser::{types::OperationDefinition, Positioned};
use schema::{inspect, Schema};
use serde_json::{Map, Value};

use super::BindError;
use crate::literal::type_ref;

/// Coerces the request variables against the operation's variable definitions. Defaults are
/// applied for absent variables, unknown variables are dropped. Every invalid variable is
/// reported.
pub(crate) fn coerce_variables(
    schema: &Schema,
    operation: &Positioned<OperationDefinition>,
    mut inputs: Map<String, Value>,
) -> Result<Map<String, Value>, Vec<BindError>> {
    let mut coerced = Map::new();
    let mut errors = Vec::new();

    for definition in &operation.node.variable_definitions {
        let name = definition.node.name.node.as_str();
        let ty = type_ref(&definition.node.var_type.node);
        let pos = definition.pos;

        let Some(value) = inputs.remove(name) else {
            if let Some(default_value) = &definition.node.default_value {
                let default_value = default_value.node.clone().into_json().unwrap_or_default();
                match schema.coerce_input_value(&ty, &default_value) {
                    Ok(value) => {
                        coerced.insert(name.to_string(), value);
                    }
                    Err(err) => errors.push(BindError::InvalidVariableValue {
                        name: name.to_string(),
                        value: inspect(pointer(&default_value, &err.path)),
                        path: err.path,
                        reason: err.message,
                        pos,
                    }),
                }
            } else if ty.is_non_null() {
                errors.push(BindError::MissingVariable {
                    name: name.to_string(),
                    ty: ty.to_string(),
                    pos,
                });
            }
            continue;
        };

        if value.is_null() && ty.is_non_null() {
            errors.push(BindError::NullVariable {
                name: name.to_string(),
                ty: ty.to_string(),
                pos,
            });
            continue;
        }

        match schema.coerce_input_value(&ty, &value) {
            Ok(value) => {
                coerced.insert(name.to_string(), value);
            }
            Err(err) => errors.push(BindError::InvalidVariableValue {
                name: name.to_string(),
                value: inspect(pointer(&value, &err.path)),
                path: err.path,
                reason: err.message,
                pos,
            }),
        }
    }

    if errors.is_empty() {
        Ok(coerced)
    } else {
        Err(errors)
    }
}

/// The list item at `path`, the value itself when it isn't a list.
fn pointer<'v>(value: &'v Value, path: &[usize]) -> &'v Value {
    path.iter()
        .try_fold(value, |value, index| value.as_array().and_then(|items| items.get(*index)))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use schema::{Field, Object};
    use serde_json::json;

    use super::*;

    fn coerce(document: &str, variables: Value) -> Result<Value, Vec<String>> {
        let schema = Schema::build(Object::new("Query").field(Field::new("a", "Int")))
            .finish()
            .unwrap();
        let document = async_graphql_parser::parse_query(document).unwrap();
        let (_, operation) = document.operations.iter().next().unwrap();
        let Value::Object(variables) = variables else {
            unreachable!()
        };
        coerce_variables(&schema, operation, variables)
            .map(Value::Object)
            .map_err(|errors| errors.into_iter().map(|err| err.to_string()).collect())
    }

    #[test]
    fn defaults_and_unknown_variables() {
        assert_eq!(
            coerce(
                "query ($a: Int = 3, $b: [Int] = 1, $c: String) { a }",
                json!({"unknown": true})
            ),
            Ok(json!({"a": 3, "b": [1]}))
        );
    }

    #[test]
    fn missing_and_null_variables() {
        assert_eq!(
            coerce("query ($a: Int!, $b: Int!) { a }", json!({"b": null})),
            Err(vec![
                "Variable '$a' of required type 'Int!' was not provided.".to_string(),
                "Variable '$b' of non-null type 'Int!' must not be null.".to_string(),
            ])
        );
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            coerce("query ($a: Int, $b: [Int!]) { a }", json!({"a": "abc", "b": [1, null]})),
            Err(vec![
                "Variable '$a' got invalid value \"abc\"; Int cannot represent non-integer value: \"abc\"".to_string(),
                "Variable '$b' got invalid value null at 'b[1]'; Expected non-nullable type 'Int!' not to be null."
                    .to_string(),
            ])
        );
    }
}
