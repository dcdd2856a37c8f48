use axum::{body::Body, response::Response};
use headers::{ContentType, HeaderMapExt};
use http::StatusCode;

/// Requests that couldn't be executed are answered with the error message as plain text.
pub(crate) fn refuse_request_with(status: StatusCode, message: String) -> Response {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response.headers_mut().typed_insert(ContentType::text_utf8());
    response
}

/// Executed requests always answer 200, errors included.
pub(crate) fn graphql_response(response: &engine::Response) -> Response {
    if response.is_refused() {
        let message = response
            .errors
            .first()
            .map(|error| error.message.to_string())
            .unwrap_or_default();
        return refuse_request_with(response.status(), message);
    }

    match serde_json::to_vec(response) {
        Ok(bytes) => {
            let mut http_response = Response::new(Body::from(bytes));
            http_response.headers_mut().typed_insert(ContentType::json());
            http_response
        }
        Err(err) => {
            tracing::error!("could not serialize the GraphQL response: {err}");
            refuse_request_with(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
        }
    }
}

pub(crate) fn html(page: String) -> Response {
    let mut response = Response::new(Body::from(page));
    response.headers_mut().typed_insert(ContentType::html());
    response
}
