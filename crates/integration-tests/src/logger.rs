use std::sync::{Arc, Mutex};

use engine::ErrorLogger;

/// Keeps every logged error, in order.
#[derive(Debug, Default, Clone)]
pub struct ListLogger(Arc<Mutex<Vec<String>>>);

impl ListLogger {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ErrorLogger for ListLogger {
    fn log_error(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

/// Records the message and level of every tracing event, for tests asserting what reaches
/// `tracing`. Install it with `tracing::subscriber::with_default`.
#[derive(Debug, Default, Clone)]
pub struct CaptureLayer(Arc<Mutex<Vec<(tracing::Level, String)>>>);

impl CaptureLayer {
    pub fn events(&self) -> Vec<(tracing::Level, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push((*event.metadata().level(), visitor.0));
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_string();
        }
    }
}
