use std::collections::BTreeMap;

use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    response::{IntoResponse, Response},
};
use engine::{schema::UploadFile, Request, UploadPathError};
use http::{request::Parts, StatusCode};
use mediatype::{
    names::{APPLICATION, FORM_DATA, JSON, MULTIPART},
    MediaType,
};

/// A request that can't be handled as a GraphQL request. Answered with a plain text body.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("GraphQL only supports GET and POST requests.")]
    MethodNotAllowed,
    #[error("queries are not allowed when using GET")]
    QueriesNotAllowedViaGet,
    #[error("GraphQL Playground has been disabled")]
    PlaygroundDisabled,
    #[error("No GraphQL query found in the request")]
    NoQuery,
    #[error("Unable to parse request body as JSON")]
    InvalidJson,
    #[error("Unable to parse variables as JSON")]
    InvalidVariables,
    #[error("Unsupported Media Type")]
    UnsupportedMediaType,
    #[error("Request body is too large")]
    BodyTooLarge,
    #[error("Unable to parse the multipart body")]
    InvalidMultipart,
    #[error("File(s) missing in form data")]
    MissingFiles,
    #[error(transparent)]
    InvalidUploadPath(#[from] UploadPathError),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::MethodNotAllowed | RequestError::QueriesNotAllowedViaGet => StatusCode::METHOD_NOT_ALLOWED,
            RequestError::PlaygroundDisabled => StatusCode::NOT_FOUND,
            RequestError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RequestError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RequestError::NoQuery
            | RequestError::InvalidJson
            | RequestError::InvalidVariables
            | RequestError::InvalidMultipart
            | RequestError::MissingFiles
            | RequestError::InvalidUploadPath(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status(), "refused request: {self}");
        crate::error_response::refuse_request_with(self.status(), self.to_string())
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryParams {
    query: Option<String>,
    operation_name: Option<String>,
    variables: Option<String>,
}

pub(crate) fn from_query_params(parts: &Parts) -> Result<Request, RequestError> {
    let params = serde_urlencoded::from_str::<QueryParams>(parts.uri.query().unwrap_or_default())
        .map_err(|_| RequestError::NoQuery)?;
    let query = params.query.filter(|query| !query.is_empty()).ok_or(RequestError::NoQuery)?;

    let mut request = Request::new(query);
    request.operation_name = params.operation_name.filter(|name| !name.is_empty());
    if let Some(variables) = params.variables.filter(|variables| !variables.is_empty()) {
        request.variables = serde_json::from_str(&variables).map_err(|_| RequestError::InvalidVariables)?;
    }

    Ok(request)
}

enum BodyFormat {
    Json,
    Multipart,
}

/// A missing content type is read as JSON.
fn body_format(parts: &Parts) -> Result<BodyFormat, RequestError> {
    let Some(content_type) = parts.headers.get(http::header::CONTENT_TYPE) else {
        return Ok(BodyFormat::Json);
    };
    let media_type = content_type
        .to_str()
        .ok()
        .and_then(|content_type| MediaType::parse(content_type).ok())
        .ok_or(RequestError::UnsupportedMediaType)?;

    if media_type.ty == APPLICATION && media_type.subty == JSON {
        Ok(BodyFormat::Json)
    } else if media_type.ty == MULTIPART && media_type.subty == FORM_DATA {
        Ok(BodyFormat::Multipart)
    } else {
        Err(RequestError::UnsupportedMediaType)
    }
}

pub(crate) async fn from_body(parts: &Parts, body: Body, body_limit: usize) -> Result<Request, RequestError> {
    match body_format(parts)? {
        BodyFormat::Json => {
            let bytes = axum::body::to_bytes(body, body_limit)
                .await
                .map_err(|_| RequestError::BodyTooLarge)?;
            let request = serde_json::from_slice::<Request>(&bytes).map_err(|_| RequestError::InvalidJson)?;
            if request.query.is_empty() {
                return Err(RequestError::NoQuery);
            }
            Ok(request)
        }
        BodyFormat::Multipart => from_multipart(parts, body).await,
    }
}

/// Reads a multipart request made of an `operations` part holding the JSON request, a `map`
/// part assigning each file part to variable paths, and the file parts themselves.
async fn from_multipart(parts: &Parts, body: Body) -> Result<Request, RequestError> {
    let mut multipart_request = http::Request::new(body);
    *multipart_request.headers_mut() = parts.headers.clone();
    *multipart_request.extensions_mut() = parts.extensions.clone();
    let mut multipart = Multipart::from_request(multipart_request, &())
        .await
        .map_err(|_| RequestError::InvalidMultipart)?;

    let mut operations = None;
    let mut map = None;
    let mut files = BTreeMap::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "operations" => operations = Some(field.text().await.map_err(multipart_error)?),
            "map" => map = Some(field.text().await.map_err(multipart_error)?),
            _ => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let content = field.bytes().await.map_err(multipart_error)?;
                files.insert(
                    name,
                    UploadFile {
                        filename,
                        content_type,
                        content,
                    },
                );
            }
        }
    }

    let (Some(operations), Some(map)) = (operations, map) else {
        return Err(RequestError::InvalidMultipart);
    };
    let mut request = serde_json::from_str::<Request>(&operations).map_err(|_| RequestError::InvalidJson)?;
    if request.query.is_empty() {
        return Err(RequestError::NoQuery);
    }

    let map = serde_json::from_str::<BTreeMap<String, Vec<String>>>(&map).map_err(|_| RequestError::InvalidMultipart)?;
    for (key, paths) in map {
        let file = files.remove(&key).ok_or(RequestError::MissingFiles)?;
        for path in paths {
            request.set_upload(&path, file.clone())?;
        }
    }

    Ok(request)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> RequestError {
    tracing::debug!("invalid multipart body: {err}");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RequestError::BodyTooLarge
    } else {
        RequestError::InvalidMultipart
    }
}
