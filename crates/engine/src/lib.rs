//! A GraphQL engine over a statically built [Schema].
//!
//! ```ignore
//! let engine = Engine::new(schema);
//! let response = engine.execute(Request::new("{ hello }")).await;
//! ```

mod engine;
mod execution;
mod logger;
mod request;
mod response;

pub use ::error::{ErrorCode, ErrorPath, GraphqlError, Location};
pub use ::operation::OperationType;
pub use ::schema;
pub use engine::Engine;
pub use logger::{process_errors, ErrorLogger, TracingErrorLogger};
pub use request::{Request, UploadPathError};
pub use response::Response;
pub use schema::Schema;
