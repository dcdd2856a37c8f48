use integration_tests::{runtime, GraphqlTestClient, TestQuery};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::TestView;

#[test]
fn graphql_query() {
    let view = TestView::new();
    let response = runtime().block_on(view.client.query(TestQuery::new("{ hello }")));
    assert_eq!(response.status, http::StatusCode::OK);
    assert_eq!(response.data, Some(json!({"hello": "strawberry"})));
}

#[test]
fn graphql_query_model() {
    let view = TestView::new();
    view.examples.create("This is a demo");
    let response = runtime().block_on(view.client.query(TestQuery::new("{ example }")));
    assert_eq!(response.data, Some(json!({"example": "This is a demo"})));
}

#[test]
fn async_graphql_query() {
    let view = TestView::new();
    view.examples.create("This is a demo async");
    let response = runtime().block_on(view.client.query(TestQuery::new("{ helloAsync exampleAsync }")));
    assert_eq!(
        response.data,
        Some(json!({"helloAsync": "async strawberry", "exampleAsync": "This is a demo async"}))
    );
    assert_eq!(view.examples.async_reads(), 1);
}

#[test]
fn returns_errors_and_data() {
    let view = TestView::new();
    let response = runtime().block_on(view.client.query(TestQuery::new("{ hello, alwaysFail }").allow_errors()));

    assert_eq!(response.status, http::StatusCode::OK);
    assert_eq!(response.data, Some(json!({"hello": "strawberry", "alwaysFail": null})));
    insta::assert_json_snapshot!(response.errors, @r###"
    [
      {
        "message": "You are not authorized",
        "locations": [
          {
            "line": 1,
            "column": 10
          }
        ],
        "path": [
          "alwaysFail"
        ],
        "extensions": {
          "code": "UNAUTHORIZED"
        }
      }
    ]
    "###);
}

#[test]
fn variables_and_headers() {
    let view = TestView::new();
    let response = runtime().block_on(
        view.client.query(
            TestQuery::new("query ($message: String!) { echo(message: $message) header(name: \"x-sprig\") }")
                .variables(json!({"message": "hi"}))
                .header("x-sprig", "header value"),
        ),
    );
    assert_eq!(response.data, Some(json!({"echo": "hi", "header": "header value"})));
}

#[test]
fn invalid_variables() {
    let view = TestView::new();
    let response = runtime().block_on(
        view.client.query(
            TestQuery::new("query ($message: String!) { echo(message: $message) }")
                .variables(json!({"message": 1.5}))
                .allow_errors(),
        ),
    );
    assert_eq!(response.status, http::StatusCode::OK);
    assert_eq!(response.data, None);
    assert_eq!(
        response.errors,
        Some(vec![json!({
            "message": "Variable '$message' got invalid value 1.5; String cannot represent a non string value: 1.5",
            "locations": [{"line": 1, "column": 8}],
            "extensions": {"code": "VARIABLE_ERROR"}
        })])
    );
}
