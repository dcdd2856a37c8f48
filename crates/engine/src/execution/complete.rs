use std::sync::Arc;

use error::{ErrorCode, ErrorPath, GraphqlError};
use futures_util::{future::BoxFuture, FutureExt};
use operation::BoundField;
use schema::{TypeDefinition, TypeRef};
use serde_json::Value;

use super::{ExecutionResult, Executor, Propagate};

/// Completes the resolved value of a field against the field type.
///
/// A failure records an error and returns [Propagate], the nearest field or list item
/// accepting null stops it.
pub(super) struct Completion<'a> {
    pub executor: &'a Executor,
    pub parent_type: &'a str,
    pub field: &'a BoundField,
}

impl<'a> Completion<'a> {
    pub fn complete_value<'b>(
        &'b self,
        ty: &'b TypeRef,
        value: Value,
        path: ErrorPath,
        errors: &'b mut Vec<GraphqlError>,
    ) -> BoxFuture<'b, ExecutionResult<Value>>
    where
        'a: 'b,
    {
        async move {
            match ty {
                TypeRef::NonNull(inner) => {
                    let value = self.complete_value(inner, value, path.clone(), errors).await?;
                    if value.is_null() {
                        let message = format!(
                            "Cannot return null for non-nullable field {}.{}.",
                            self.parent_type, self.field.name
                        );
                        return self.fail(message, path, errors);
                    }
                    Ok(value)
                }
                _ if value.is_null() => Ok(Value::Null),
                TypeRef::List(item_type) => {
                    let Value::Array(items) = value else {
                        let message = format!(
                            "Expected Iterable, but did not find one for field '{}.{}'.",
                            self.parent_type, self.field.name
                        );
                        return self.fail(message, path, errors);
                    };

                    let mut completed = Vec::with_capacity(items.len());
                    for (index, item) in items.into_iter().enumerate() {
                        match self.complete_value(item_type, item, path.child(index), errors).await {
                            Ok(item) => completed.push(item),
                            Err(Propagate) if !item_type.is_non_null() => completed.push(Value::Null),
                            Err(Propagate) => return Err(Propagate),
                        }
                    }
                    Ok(Value::Array(completed))
                }
                TypeRef::Named(name) => self.complete_named_value(name, value, path, errors).await,
            }
        }
        .boxed()
    }

    async fn complete_named_value(
        &self,
        type_name: &str,
        value: Value,
        path: ErrorPath,
        errors: &mut Vec<GraphqlError>,
    ) -> ExecutionResult<Value> {
        let schema = &self.executor.schema;
        let coerced = match schema.type_definition(type_name) {
            Some(TypeDefinition::Scalar(scalar)) => scalar.kind.coerce_output(&value),
            Some(TypeDefinition::Enum(enum_definition)) => enum_definition.coerce_output(&value),
            Some(TypeDefinition::Object(_)) => {
                let object = self
                    .executor
                    .execute_selection_set(
                        type_name,
                        &self.field.selection_set,
                        Arc::new(value),
                        path,
                        false,
                        errors,
                    )
                    .await?;
                return Ok(Value::Object(object));
            }
            None => {
                tracing::error!("field {}.{} has unknown type {type_name}", self.parent_type, self.field.name);
                errors.push(
                    GraphqlError::internal_server_error()
                        .with_location(self.field.location)
                        .with_path(path),
                );
                return Err(Propagate);
            }
        };

        coerced.or_else(|message| self.fail(message, path, errors))
    }

    fn fail(&self, message: String, path: ErrorPath, errors: &mut Vec<GraphqlError>) -> ExecutionResult<Value> {
        errors.push(
            GraphqlError::new(message, ErrorCode::ResolverError)
                .with_location(self.field.location)
                .with_path(path),
        );
        Err(Propagate)
    }
}
