use error::GraphqlError;
use serde_json::{Map, Value};

/// A GraphQL response.
///
/// `data` is absent when the request was refused before execution, null when a non-null error
/// propagated up to the root.
#[derive(Debug, Default, serde::Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
    #[serde(skip)]
    status: http::StatusCode,
}

impl Response {
    pub(crate) fn execution(data: Value, errors: Vec<GraphqlError>) -> Self {
        Response {
            data: Some(data),
            errors,
            ..Default::default()
        }
    }

    /// Errors found before execution: parsing, validation and variables.
    pub fn request_errors(errors: Vec<GraphqlError>) -> Self {
        Response {
            errors,
            ..Default::default()
        }
    }

    /// The request could not be handled as a GraphQL request at all.
    pub fn refuse_request_with(status: http::StatusCode, error: GraphqlError) -> Self {
        Response {
            errors: vec![error],
            status,
            ..Default::default()
        }
    }

    /// Status of the HTTP response. GraphQL errors alone don't change it.
    pub fn status(&self) -> http::StatusCode {
        self.status
    }

    pub fn is_refused(&self) -> bool {
        !self.status.is_success()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use error::Location;
    use serde_json::json;

    use super::*;

    #[test]
    fn serialization() {
        let response = Response::execution(
            json!({"hello": "strawberry", "alwaysFail": null}),
            vec![GraphqlError::unauthorized("You are not authorized").with_location(Location::new(1, 10))],
        );
        insta::assert_json_snapshot!(response, @r###"
        {
          "data": {
            "hello": "strawberry",
            "alwaysFail": null
          },
          "errors": [
            {
              "message": "You are not authorized",
              "locations": [
                {
                  "line": 1,
                  "column": 10
                }
              ],
              "extensions": {
                "code": "UNAUTHORIZED"
              }
            }
          ]
        }
        "###);

        let response = Response::request_errors(vec![GraphqlError::parsing("Syntax Error: oops")]);
        assert_eq!(
            response.to_json(),
            json!({"errors": [{"message": "Syntax Error: oops", "extensions": {"code": "OPERATION_PARSING_ERROR"}}]})
        );
        assert!(!response.is_refused());

        assert_eq!(Response::execution(Value::Null, Vec::new()).to_json(), json!({"data": null}));
    }
}
