use bytes::Bytes;
use config::ViewConfig;
use integration_tests::runtime;

use crate::TestView;

fn browser_request(uri: &str) -> http::Request<Bytes> {
    http::Request::get(uri)
        .header(http::header::ACCEPT, "text/html,application/xhtml+xml;q=0.9")
        .body(Bytes::new())
        .unwrap()
}

#[test]
fn playground_view() {
    let view = TestView::new();
    runtime().block_on(async move {
        let (status, headers, body) = view.client.raw(browser_request("/graphql?tab=1")).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(headers[http::header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert!(body.contains("GraphQL Playground"));
        assert!(body.contains(r#"endpoint: "/graphql?tab=1""#));
    });
}

#[test]
fn playground_disabled() {
    let view = TestView::with_config(ViewConfig {
        playground: false,
        ..Default::default()
    });
    runtime().block_on(async move {
        let (status, _, body) = view.client.raw(browser_request("/graphql")).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(body, "GraphQL Playground has been disabled");
    });
}

#[test]
fn playground_with_trailing_slash() {
    let view = TestView::new();
    runtime().block_on(async move {
        let (status, _, body) = view.client.raw(browser_request("/graphql/")).await;
        assert_eq!(status, http::StatusCode::OK);
        assert!(body.contains("GraphQL Playground"));
        assert!(body.contains(r#"endpoint: "/graphql/""#));
    });
}
