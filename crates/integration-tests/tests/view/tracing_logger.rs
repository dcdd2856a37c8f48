use engine::{process_errors, Engine, Request, TracingErrorLogger};
use integration_tests::CaptureLayer;
use pretty_assertions::assert_eq;
use tracing_subscriber::layer::SubscriberExt;

fn engine() -> Engine {
    Engine::new(integration_tests::schema::schema())
}

#[test]
fn default_logger_writes_errors_through_tracing() {
    let capture = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    let document = "{ hello, mistake }";
    let response = engine().execute_sync(Request::new(document));
    tracing::subscriber::with_default(subscriber, || {
        process_errors(&TracingErrorLogger, &response.errors, document);
    });

    let errors = capture
        .events()
        .into_iter()
        .filter(|(level, _)| *level == tracing::Level::ERROR)
        .map(|(_, message)| message)
        .collect::<Vec<_>>();
    assert_eq!(
        errors,
        ["Cannot query field 'mistake' on type 'Query'.\n\nGraphQL request:1:10\n1 | { hello, mistake }\n  |          ^"]
    );
}

