//! Resolves a bound operation into response data.
//!
//! Every field runs its permissions, then its resolver, then completes the resolved value
//! against its type. Errors never abort the execution: the field is set to null and the error
//! is recorded with the field location and response path. A null in a non-null position
//! propagates to the nearest nullable parent, up to `data` itself.

mod complete;

use std::sync::Arc;

use error::{ErrorCode, ErrorPath, GraphqlError};
use futures_util::{future::BoxFuture, FutureExt};
use operation::{BoundField, BoundOperation, OperationType};
use schema::{FieldDefinition, FieldError, RequestScope, Resolver, ResolverContext, Schema, TypeRef};
use serde_json::{Map, Value};

/// How async resolvers are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Async,
    /// Async resolvers are not invoked, their fields fail.
    Sync,
}

/// A null reached a non-null position and must replace the nearest nullable parent. The error
/// itself was already recorded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Propagate;

type ExecutionResult<T> = Result<T, Propagate>;

pub(crate) struct Executor {
    schema: Arc<Schema>,
    scope: RequestScope,
    mode: Mode,
}

impl Executor {
    pub fn new(schema: Arc<Schema>, scope: RequestScope, mode: Mode) -> Self {
        Executor { schema, scope, mode }
    }

    /// Returns the `data` of the response, null when a non-null error reached the root.
    pub async fn execute(&self, operation: &BoundOperation, root_value: Arc<Value>) -> (Value, Vec<GraphqlError>) {
        let mut errors = Vec::new();
        let serial = operation.ty == OperationType::Mutation;
        let data = self
            .execute_selection_set(
                &operation.root_type,
                &operation.selection_set,
                root_value,
                ErrorPath::root(),
                serial,
                &mut errors,
            )
            .await;

        (data.map(Value::Object).unwrap_or(Value::Null), errors)
    }

    /// Fields of a selection set are resolved concurrently, except for the mutation root
    /// fields which run one after the other.
    fn execute_selection_set<'a>(
        &'a self,
        parent_type: &'a str,
        fields: &'a [BoundField],
        parent: Arc<Value>,
        path: ErrorPath,
        serial: bool,
        errors: &'a mut Vec<GraphqlError>,
    ) -> BoxFuture<'a, ExecutionResult<Map<String, Value>>> {
        async move {
            let mut object = Map::with_capacity(fields.len());
            let mut propagate = false;

            if serial {
                for field in fields {
                    match self.execute_field(parent_type, field, parent.clone(), &path, errors).await {
                        Ok(value) => {
                            object.insert(field.response_key.clone(), value);
                        }
                        Err(Propagate) => propagate = true,
                    }
                }
            } else {
                let results = futures_util::future::join_all(fields.iter().map(|field| {
                    let parent = parent.clone();
                    let path = &path;
                    async move {
                        let mut errors = Vec::new();
                        let result = self.execute_field(parent_type, field, parent, path, &mut errors).await;
                        (field, result, errors)
                    }
                }))
                .await;

                for (field, result, field_errors) in results {
                    errors.extend(field_errors);
                    match result {
                        Ok(value) => {
                            object.insert(field.response_key.clone(), value);
                        }
                        Err(Propagate) => propagate = true,
                    }
                }
            }

            if propagate {
                Err(Propagate)
            } else {
                Ok(object)
            }
        }
        .boxed()
    }

    async fn execute_field(
        &self,
        parent_type: &str,
        field: &BoundField,
        parent: Arc<Value>,
        path: &ErrorPath,
        errors: &mut Vec<GraphqlError>,
    ) -> ExecutionResult<Value> {
        let path = path.child(field.response_key.as_str());
        let Some(definition) = self.schema.field(parent_type, &field.name) else {
            // Unknown fields don't pass validation.
            return Ok(Value::Null);
        };

        let ctx = ResolverContext::new(
            self.schema.clone(),
            self.scope.clone(),
            parent_type,
            &field.name,
            parent,
            field.arguments.clone(),
            path.clone(),
        );

        let resolved = match self.resolve(definition, ctx).await {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(%path, "{}", err.message);
                errors.push(err.with_location(field.location).with_path(path));
                return null_or_propagate(&definition.ty);
            }
        };

        let completion = complete::Completion {
            executor: self,
            parent_type,
            field,
        };
        match completion.complete_value(&definition.ty, resolved, path, errors).await {
            Ok(value) => Ok(value),
            Err(Propagate) => null_or_propagate(&definition.ty),
        }
    }

    async fn resolve(&self, definition: &FieldDefinition, ctx: ResolverContext) -> Result<Value, GraphqlError> {
        for permission in &definition.permissions {
            if !permission.has_permission(ctx.parent(), &ctx) {
                return Err(GraphqlError::unauthorized(permission.message().into_owned()));
            }
        }

        match &definition.resolver {
            Resolver::Default => Ok(ctx
                .parent()
                .get(&definition.name)
                .cloned()
                .or_else(|| definition.default_value.clone())
                .unwrap_or(Value::Null)),
            Resolver::Sync(resolver) => resolver(&ctx).map_err(resolver_error),
            Resolver::Async(resolver) => match self.mode {
                Mode::Async => resolver(ctx).await.map_err(resolver_error),
                Mode::Sync => Err(GraphqlError::new(
                    format!(
                        "Field '{}.{}' has an async resolver and can't be executed synchronously.",
                        ctx.parent_type(),
                        ctx.field_name()
                    ),
                    ErrorCode::UnsupportedAsyncResolver,
                )),
            },
        }
    }
}

fn resolver_error(err: FieldError) -> GraphqlError {
    GraphqlError::new(err.message, ErrorCode::ResolverError).with_extensions(err.extensions)
}

/// A failed field is null, unless its type forbids it.
fn null_or_propagate(ty: &TypeRef) -> ExecutionResult<Value> {
    if ty.is_non_null() {
        Err(Propagate)
    } else {
        Ok(Value::Null)
    }
}
