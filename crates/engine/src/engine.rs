use std::sync::Arc;

use error::{ErrorCode, GraphqlError};
use operation::{Operation, OperationType};
use schema::{OperationLimits, RequestScope, Schema};
use tracing::Instrument;

use crate::{
    execution::{Executor, Mode},
    Request, Response,
};

/// Executes requests against a schema. Cheap to clone.
#[derive(Clone)]
pub struct Engine {
    schema: Arc<Schema>,
    operation_limits: OperationLimits,
}

impl Engine {
    pub fn new(schema: Schema) -> Self {
        Engine {
            operation_limits: *schema.operation_limits(),
            schema: Arc::new(schema),
        }
    }

    /// Replaces the operation limits the schema was built with.
    #[must_use]
    pub fn with_operation_limits(mut self, limits: OperationLimits) -> Self {
        self.operation_limits = limits;
        self
    }

    pub fn operation_limits(&self) -> &OperationLimits {
        &self.operation_limits
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub async fn execute(&self, request: Request) -> Response {
        self.run(request, Mode::Async).await
    }

    /// Executes the request on the current thread. Fields with an async resolver fail with
    /// `UNSUPPORTED_ASYNC_RESOLVER` instead of being resolved.
    pub fn execute_sync(&self, request: Request) -> Response {
        futures::executor::block_on(self.run(request, Mode::Sync))
    }

    async fn run(&self, request: Request, mode: Mode) -> Response {
        let Request {
            query,
            operation_name,
            variables,
            extensions: _,
            root_value,
            data,
            uploads,
            mutations_allowed,
        } = request;

        let operation = match Operation::parse_with_limits(
            &self.schema,
            &self.operation_limits,
            operation_name.as_deref(),
            &query,
        ) {
            Ok(operation) => operation,
            Err(errors) => return Response::request_errors(errors),
        };

        if operation.ty() == OperationType::Mutation && !mutations_allowed {
            return Response::refuse_request_with(
                http::StatusCode::METHOD_NOT_ALLOWED,
                GraphqlError::new("mutations are not allowed when using GET", ErrorCode::BadRequest),
            );
        }

        let operation = match operation.bind(&self.schema, variables) {
            Ok(operation) => operation,
            Err(errors) => return Response::request_errors(errors),
        };

        let span = tracing::debug_span!(
            "execute",
            operation.name = operation.name.as_deref().unwrap_or_default(),
            operation.ty = %operation.ty,
        );
        let scope = RequestScope {
            data: Arc::new(data),
            uploads: Arc::new(uploads),
        };
        let executor = Executor::new(self.schema.clone(), scope, mode);
        let (data, errors) = executor
            .execute(&operation, Arc::new(root_value))
            .instrument(span)
            .await;

        Response::execution(data, errors)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("operation_limits", &self.operation_limits)
            .finish_non_exhaustive()
    }
}
