//! Serves a [Engine] over HTTP with axum.
//!
//! ```ignore
//! let router = GraphqlView::new(engine)
//!     .with_config(ViewConfig::load("sprig.toml")?)
//!     .into_router()?;
//! ```

mod error_response;
mod extract;
mod handler;
mod playground;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::any, Router};
use config::{ConfigError, ExecutionMode, ViewConfig};
use engine::{
    schema::{Data, OperationLimits},
    Engine, ErrorLogger, TracingErrorLogger,
};
use serde_json::Value;
use tower_http::trace::TraceLayer;

pub use extract::RequestError;

pub type RootValueFn = Arc<dyn Fn(&http::request::Parts) -> Value + Send + Sync>;
pub type ContextFn = Arc<dyn Fn(&http::request::Parts) -> Data + Send + Sync>;

/// The GraphQL HTTP endpoint: GraphQL Playground for browsers, queries over GET, and POST
/// requests as JSON or multipart with file uploads.
#[derive(Clone)]
pub struct GraphqlView {
    engine: Engine,
    config: ViewConfig,
    error_logger: Arc<dyn ErrorLogger>,
    root_value: Option<RootValueFn>,
    context: Option<ContextFn>,
}

impl GraphqlView {
    pub fn new(engine: Engine) -> Self {
        GraphqlView {
            engine,
            config: ViewConfig::default(),
            error_logger: Arc::new(TracingErrorLogger),
            root_value: None,
            context: None,
        }
    }

    /// Operation limits of the configuration, when set, replace the schema ones.
    #[must_use]
    pub fn with_config(mut self, config: ViewConfig) -> Self {
        if !config.operation_limits.is_empty() {
            let limits = config.operation_limits;
            self.engine = self.engine.with_operation_limits(OperationLimits {
                depth: limits.depth,
                aliases: limits.aliases,
                root_fields: limits.root_fields,
                complexity: limits.complexity,
            });
        }
        self.config = config;
        self
    }

    /// Receives the errors of every executed request. Defaults to [TracingErrorLogger].
    #[must_use]
    pub fn with_error_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.error_logger = logger;
        self
    }

    /// Parent value of the root fields, computed for each request.
    #[must_use]
    pub fn with_root_value<F>(mut self, root_value: F) -> Self
    where
        F: Fn(&http::request::Parts) -> Value + Send + Sync + 'static,
    {
        self.root_value = Some(Arc::new(root_value));
        self
    }

    /// Request data available to resolvers and permissions, in addition to the request headers.
    #[must_use]
    pub fn with_context<F>(mut self, context: F) -> Self
    where
        F: Fn(&http::request::Parts) -> Data + Send + Sync + 'static,
    {
        self.context = Some(Arc::new(context));
        self
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Mounts the view on the configured path, with and without a trailing slash.
    pub fn into_router(self) -> Result<Router, ConfigError> {
        self.config.validate()?;

        let path = self.config.path.clone();
        let body_limit = self.config.request_body_limit;
        tracing::debug!(
            %path,
            sync = self.config.execution == ExecutionMode::Sync,
            "mounting GraphQL view"
        );

        let handler = any(handler::execute);
        let mut router = Router::new().route(&path, handler.clone());
        if let Some(alternate) = alternate_path(&path) {
            router = router.route(&alternate, handler);
        }

        Ok(router
            .with_state(Arc::new(self))
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(TraceLayer::new_for_http()))
    }
}

/// `/graphql` for `/graphql/` and the other way around. The root path has none.
fn alternate_path(path: &str) -> Option<String> {
    match path.strip_suffix('/') {
        Some("") => None,
        Some(trimmed) => Some(trimmed.to_string()),
        None => Some(format!("{path}/")),
    }
}

impl std::fmt::Debug for GraphqlView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlView")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn alternate_paths() {
        assert_eq!(alternate_path("/graphql").as_deref(), Some("/graphql/"));
        assert_eq!(alternate_path("/graphql/").as_deref(), Some("/graphql"));
        assert_eq!(alternate_path("/"), None);
    }
}
