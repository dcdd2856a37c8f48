#![allow(unused_crate_dependencies, clippy::panic)]

mod configuration;
mod logging;
mod playground;
mod query;
mod requests;
mod tracing_logger;
mod uploads;

use std::sync::Arc;

use config::{ConfigError, ViewConfig};
use engine::Engine;
use engine_axum::GraphqlView;
use integration_tests::{schema::Examples, AxumTestClient, ListLogger};
use serde_json::json;

/// The test schema served with a root value, a capturing error logger and stored examples.
struct TestView {
    client: AxumTestClient,
    logger: ListLogger,
    examples: Examples,
}

impl TestView {
    fn new() -> Self {
        Self::with_config(ViewConfig::default())
    }

    fn with_config(config: ViewConfig) -> Self {
        Self::try_with_config(config).unwrap()
    }

    fn try_with_config(config: ViewConfig) -> Result<Self, ConfigError> {
        let logger = ListLogger::default();
        let examples = Examples::default();
        let context_examples = examples.clone();

        let path = config.path.clone();
        let router = GraphqlView::new(Engine::new(integration_tests::schema::schema()))
            .with_config(config)
            .with_error_logger(Arc::new(logger.clone()))
            .with_root_value(|_| json!({"hello": "strawberry"}))
            .with_context(move |_| integration_tests::schema::context(&context_examples))
            .into_router()?;

        Ok(TestView {
            client: AxumTestClient::with_path(router, path),
            logger,
            examples,
        })
    }
}
