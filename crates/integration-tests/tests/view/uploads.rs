use integration_tests::{runtime, GraphqlTestClient, TestQuery};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::TestView;

#[test]
fn single_file() {
    let view = TestView::new();
    let response = runtime().block_on(
        view.client.query(
            TestQuery::new("mutation ($textFile: Upload!) { readText(textFile: $textFile) }")
                .variables(json!({"textFile": null}))
                .file("textFile", "strawberry.txt", "strawberry"),
        ),
    );
    assert_eq!(response.data, Some(json!({"readText": "strawberry"})));
}

#[test]
fn file_list() {
    let view = TestView::new();
    let response = runtime().block_on(
        view.client.query(
            TestQuery::new("mutation ($files: [Upload!]!) { readFiles(files: $files) }")
                .variables(json!({"files": [null, null]}))
                .file("files.0", "a.txt", "apple")
                .file("files.1", "b.txt", "banana"),
        ),
    );
    assert_eq!(response.data, Some(json!({"readFiles": ["a.txt: apple", "b.txt: banana"]})));
}

#[test]
fn file_for_unknown_variable() {
    let view = TestView::new();
    let request = TestQuery::new("mutation ($textFile: Upload!) { readText(textFile: $textFile) }")
        .variables(json!({"textFile": null}))
        .file("otherFile", "strawberry.txt", "strawberry")
        .into_http_request("/graphql");
    let (status, _, body) = runtime().block_on(view.client.raw(request));
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid upload path 'variables.otherFile'");
}
