use integration_tests::{runtime, GraphqlTestClient, TestQuery};
use pretty_assertions::assert_eq;

use crate::TestView;

#[test]
fn log_handled_error() {
    let view = TestView::new();
    runtime().block_on(view.client.query(TestQuery::new("{ hello, alwaysFail }").allow_errors()));
    assert_eq!(view.logger.messages(), ["You are not authorized"]);
}

#[test]
fn log_unhandled_error() {
    let view = TestView::new();
    runtime().block_on(view.client.query(TestQuery::new("{ hello, mistake }").allow_errors()));
    assert_eq!(
        view.logger.messages(),
        ["Cannot query field 'mistake' on type 'Query'.\n\nGraphQL request:1:10\n1 | { hello, mistake }\n  |          ^"]
    );
}

#[test]
fn successful_requests_log_nothing() {
    let view = TestView::new();
    runtime().block_on(view.client.query(TestQuery::new("{ hello }")));
    assert!(view.logger.messages().is_empty());
}
