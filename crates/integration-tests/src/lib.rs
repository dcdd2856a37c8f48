#![allow(unused_crate_dependencies, clippy::panic)]

pub mod client;
pub mod logger;
pub mod schema;

use std::sync::OnceLock;

pub use client::*;
pub use logger::{CaptureLayer, ListLogger};
use tokio::runtime::Runtime;
use tracing_subscriber::filter::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "sprig_engine=debug,sprig_engine_axum=debug,tower_http=debug";

#[ctor::ctor]
fn setup_logging() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .with_target(true)
        .without_time()
        .init();
}

/// Shared runtime for the blocking tests, a single worker keeps log capture on one thread.
pub fn runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    })
}
