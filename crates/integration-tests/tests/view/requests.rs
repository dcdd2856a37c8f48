use bytes::Bytes;
use integration_tests::runtime;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::TestView;

fn post(content_type: &str, body: &'static str) -> http::Request<Bytes> {
    http::Request::post("/graphql")
        .header(http::header::CONTENT_TYPE, content_type)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

fn get(uri: &str) -> http::Request<Bytes> {
    http::Request::get(uri).body(Bytes::new()).unwrap()
}

#[test]
fn query_via_get() {
    let view = TestView::new();
    runtime().block_on(async move {
        let (status, headers, body) = view.client.raw(get("/graphql?query=%7B%20hello%20%7D")).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(headers[http::header::CONTENT_TYPE], "application/json");
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"data": {"hello": "strawberry"}})
        );
    });
}

#[test]
fn mutation_via_get() {
    let view = TestView::new();
    runtime().block_on(async move {
        let uri = "/graphql?query=mutation%20%7B%20readFiles(files%3A%20%5B%5D)%20%7D";
        let (status, _, body) = view.client.raw(get(uri)).await;
        assert_eq!(status, http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, "mutations are not allowed when using GET");
    });
}

#[test]
fn queries_via_get_disabled() {
    let view = TestView::with_config(config::ViewConfig {
        allow_queries_via_get: false,
        ..Default::default()
    });
    runtime().block_on(async move {
        let (status, _, body) = view.client.raw(get("/graphql?query=%7B%20hello%20%7D")).await;
        assert_eq!(status, http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, "queries are not allowed when using GET");
    });
}

#[test]
fn refused_requests() {
    let view = TestView::new();
    runtime().block_on(async move {
        let put = http::Request::put("/graphql").body(Bytes::new()).unwrap();
        let cases = [
            (put, 405, "GraphQL only supports GET and POST requests."),
            (get("/graphql"), 400, "No GraphQL query found in the request"),
            (post("application/json", "{ hello }"), 400, "Unable to parse request body as JSON"),
            (post("application/json", r#"{"variables": {}}"#), 400, "No GraphQL query found in the request"),
            (post("text/plain", "{ hello }"), 415, "Unsupported Media Type"),
        ];

        for (request, expected_status, expected_body) in cases {
            let (status, _, body) = view.client.raw(request).await;
            assert_eq!((status.as_u16(), body.as_str()), (expected_status, expected_body));
        }
    });
    assert!(view.logger.messages().is_empty());
}

#[test]
fn body_limit() {
    let view = TestView::with_config(config::ViewConfig {
        request_body_limit: 16,
        ..Default::default()
    });
    runtime().block_on(async move {
        let request = post("application/json", r#"{"query": "{ hello helloAsync }"}"#);
        let (status, _, body) = view.client.raw(request).await;
        assert_eq!(status, http::StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, "Request body is too large");
    });
}

#[test]
fn trailing_slash() {
    let view = TestView::new();
    runtime().block_on(async move {
        let request = http::Request::post("/graphql/")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Bytes::from_static(br#"{"query": "{ hello }"}"#))
            .unwrap();
        let (status, _, body) = view.client.raw(request).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"data": {"hello": "strawberry"}})
        );

        let (status, _, body) = view.client.raw(get("/graphql/?query=%7B%20hello%20%7D")).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"data": {"hello": "strawberry"}})
        );
    });
}
