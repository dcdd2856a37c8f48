use std::sync::Arc;

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use config::ExecutionMode;
use engine::process_errors;
use http::{request::Parts, Method};
use mediatype::{
    names::{HTML, TEXT},
    MediaTypeList,
};

use crate::{error_response, extract, playground, GraphqlView, RequestError};

pub(crate) async fn execute(State(view): State<Arc<GraphqlView>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    if parts.method != Method::GET && parts.method != Method::POST {
        return RequestError::MethodNotAllowed.into_response();
    }

    if accepts_html(&parts) {
        if !view.config.playground {
            return RequestError::PlaygroundDisabled.into_response();
        }
        let endpoint = parts
            .uri
            .path_and_query()
            .map(|path_and_query| path_and_query.as_str())
            .unwrap_or(view.config.path.as_str());
        return error_response::html(playground::render(endpoint));
    }

    let request = if parts.method == Method::GET {
        if !view.config.allow_queries_via_get {
            return RequestError::QueriesNotAllowedViaGet.into_response();
        }
        extract::from_query_params(&parts)
    } else {
        extract::from_body(&parts, body, view.config.request_body_limit).await
    };
    let mut request = match request {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    request.mutations_allowed = !parts.method.is_safe();
    request.data.insert(parts.headers.clone());
    if let Some(context) = &view.context {
        request.data.merge(context(&parts));
    }
    if let Some(root_value) = &view.root_value {
        request.root_value = root_value(&parts);
    }

    let document = request.query.clone();
    let response = match view.config.execution {
        ExecutionMode::Async => view.engine.execute(request).await,
        ExecutionMode::Sync => {
            let engine = view.engine.clone();
            match tokio::task::spawn_blocking(move || engine.execute_sync(request)).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!("synchronous execution failed: {err}");
                    return error_response::refuse_request_with(
                        http::StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    );
                }
            }
        }
    };

    if !response.is_refused() {
        process_errors(view.error_logger.as_ref(), &response.errors, &document);
    }

    error_response::graphql_response(&response)
}

fn accepts_html(parts: &Parts) -> bool {
    parts
        .headers
        .get_all(http::header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(MediaTypeList::new)
        .filter_map(Result::ok)
        .any(|media_type| media_type.ty == TEXT && media_type.subty == HTML)
}
