use error::{ErrorCodeCounter, GraphqlError};

/// Destination of the errors of every executed request.
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, message: &str);
}

/// Writes errors with `tracing::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn log_error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Logs every error once. Request errors carry an excerpt of `document` around each location.
pub fn process_errors(logger: &dyn ErrorLogger, errors: &[GraphqlError], document: &str) {
    if errors.is_empty() {
        return;
    }

    for error in errors {
        logger.log_error(&error.report(document).to_string());
    }

    let counter = ErrorCodeCounter::from_errors(errors);
    for (code, count) in counter.iter() {
        tracing::debug!(%code, count, "errors in response");
    }
}
