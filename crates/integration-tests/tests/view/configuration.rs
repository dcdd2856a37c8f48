use config::{ConfigError, ExecutionMode, ViewConfig};
use indoc::indoc;
use integration_tests::{runtime, GraphqlTestClient, TestQuery};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::TestView;

#[test]
fn custom_path_and_limits() {
    let config = ViewConfig::from_toml(indoc! {r#"
        path = "/api"

        [operation_limits]
        root_fields = 1
    "#})
    .unwrap();
    let view = TestView::with_config(config);

    runtime().block_on(async move {
        let response = view.client.query(TestQuery::new("{ hello }")).await;
        assert_eq!(response.data, Some(json!({"hello": "strawberry"})));

        let response = view.client.query(TestQuery::new("{ hello helloAsync }").allow_errors()).await;
        assert_eq!(response.status, http::StatusCode::OK);
        assert_eq!(response.data, None);
        assert_eq!(
            response.errors,
            Some(vec![json!({
                "message": "Query contains too many root fields.",
                "locations": [{"line": 1, "column": 1}],
                "extensions": {"code": "OPERATION_VALIDATION_ERROR"}
            })])
        );
    });
}

#[test]
fn sync_execution() {
    let view = TestView::with_config(ViewConfig {
        execution: ExecutionMode::Sync,
        ..Default::default()
    });
    view.examples.create("This is a demo");

    runtime().block_on(async move {
        let response = view.client.query(TestQuery::new("{ hello example }")).await;
        assert_eq!(response.data, Some(json!({"hello": "strawberry", "example": "This is a demo"})));

        let response = view.client.query(TestQuery::new("{ exampleAsync }").allow_errors()).await;
        assert_eq!(response.data, Some(json!(null)));
        assert_eq!(
            response.errors.as_ref().map(|errors| errors[0]["extensions"]["code"].clone()),
            Some(json!("UNSUPPORTED_ASYNC_RESOLVER"))
        );
        assert_eq!(view.examples.async_reads(), 0);

        let response = view.client.query(TestQuery::new("{ helloAsync }").allow_errors()).await;
        assert_eq!(response.data, Some(json!(null)));
        insta::assert_json_snapshot!(response.errors, @r###"
        [
          {
            "message": "Field 'Query.helloAsync' has an async resolver and can't be executed synchronously.",
            "locations": [
              {
                "line": 1,
                "column": 3
              }
            ],
            "path": [
              "helloAsync"
            ],
            "extensions": {
              "code": "UNSUPPORTED_ASYNC_RESOLVER"
            }
          }
        ]
        "###);
    });
}

#[test]
fn invalid_path_is_refused() {
    for path in ["graphql", "/graphql/:id"] {
        let result = TestView::try_with_config(ViewConfig {
            path: path.to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidPath(_))), "{path} was accepted");
    }
}
