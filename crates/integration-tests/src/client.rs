//! A client driving GraphQL requests through an HTTP service, as a browser or an application
//! would send them.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

const MULTIPART_BOUNDARY: &str = "sprig-test-boundary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestFormat {
    #[default]
    Json,
    /// GraphQL multipart request, required to send files.
    Multipart,
}

#[derive(Debug, Clone)]
pub struct TestFile {
    /// Path of the variable receiving the file, `file` or `files.0`.
    pub variable: String,
    pub filename: String,
    pub content_type: String,
    pub content: Bytes,
}

#[derive(Debug, Clone)]
pub struct TestQuery {
    pub query: String,
    pub variables: Option<Value>,
    pub headers: http::HeaderMap,
    /// Whether [GraphqlTestClient::query] fails when the response has errors.
    pub asserts_errors: bool,
    pub format: RequestFormat,
    pub files: Vec<TestFile>,
}

impl TestQuery {
    pub fn new(query: impl Into<String>) -> Self {
        TestQuery {
            query: query.into(),
            variables: None,
            headers: http::HeaderMap::new(),
            asserts_errors: true,
            format: RequestFormat::Json,
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn variables(mut self, variables: impl serde::Serialize) -> Self {
        self.variables = Some(serde_json::to_value(variables).expect("variables to be serializable"));
        self
    }

    #[must_use]
    pub fn header<N, V>(mut self, name: N, value: V) -> Self
    where
        N: TryInto<http::HeaderName, Error: std::fmt::Debug>,
        V: TryInto<http::HeaderValue, Error: std::fmt::Debug>,
    {
        self.headers.insert(name.try_into().unwrap(), value.try_into().unwrap());
        self
    }

    #[must_use]
    pub fn allow_errors(mut self) -> Self {
        self.asserts_errors = false;
        self
    }

    /// Sends the file as a multipart request, in the variable at `variable`.
    #[must_use]
    pub fn file(mut self, variable: &str, filename: &str, content: &'static str) -> Self {
        self.format = RequestFormat::Multipart;
        self.files.push(TestFile {
            variable: variable.to_string(),
            filename: filename.to_string(),
            content_type: "text/plain".to_string(),
            content: Bytes::from_static(content.as_bytes()),
        });
        self
    }

    pub fn into_http_request(self, path: &str) -> http::Request<Bytes> {
        let mut operations = serde_json::Map::new();
        operations.insert("query".to_string(), Value::String(self.query));
        if let Some(variables) = self.variables {
            operations.insert("variables".to_string(), variables);
        }
        let operations = Value::Object(operations).to_string();

        let (content_type, body) = match self.format {
            RequestFormat::Json => ("application/json".to_string(), Bytes::from(operations)),
            RequestFormat::Multipart => (
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
                multipart_body(&operations, &self.files),
            ),
        };

        let mut request = http::Request::builder()
            .method(http::Method::POST)
            .uri(path)
            .header(http::header::CONTENT_TYPE, content_type)
            .body(body)
            .unwrap();
        request.headers_mut().extend(self.headers);
        request
    }
}

fn multipart_body(operations: &str, files: &[TestFile]) -> Bytes {
    let map = files
        .iter()
        .enumerate()
        .map(|(index, file)| (index.to_string(), Value::from(vec![format!("variables.{}", file.variable)])))
        .collect::<serde_json::Map<_, _>>();

    let mut body = Vec::new();
    let mut text_part = |name: &str, content: &str| {
        body.extend_from_slice(
            format!("--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{content}\r\n")
                .as_bytes(),
        );
    };
    text_part("operations", operations);
    text_part("map", &Value::Object(map).to_string());

    for (index, file) in files.iter().enumerate() {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{index}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    body.into()
}

#[derive(Debug, Clone, serde::Deserialize)]
struct ResponseBody {
    errors: Option<Vec<Value>>,
    data: Option<Value>,
    extensions: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct TestResponse {
    pub status: http::StatusCode,
    pub errors: Option<Vec<Value>>,
    pub data: Option<Value>,
    pub extensions: Option<Value>,
}

#[async_trait]
pub trait GraphqlTestClient: Send + Sync {
    /// Path of the GraphQL endpoint.
    fn path(&self) -> &str;

    async fn send(&self, request: http::Request<Bytes>) -> http::Response<Bytes>;

    async fn query(&self, query: TestQuery) -> TestResponse {
        let asserts_errors = query.asserts_errors;
        let response = self.send(query.into_http_request(self.path())).await;
        let status = response.status();
        let body: ResponseBody = serde_json::from_slice(response.body()).unwrap_or_else(|err| {
            panic!(
                "response is not a GraphQL response ({err}): {}",
                String::from_utf8_lossy(response.body())
            )
        });

        if asserts_errors {
            assert!(body.errors.is_none(), "unexpected errors: {:#?}", body.errors);
        }

        TestResponse {
            status,
            errors: body.errors,
            data: body.data,
            extensions: body.extensions,
        }
    }
}

/// Sends requests to an axum router without binding a socket.
#[derive(Clone)]
pub struct AxumTestClient {
    router: axum::Router,
    path: String,
}

impl AxumTestClient {
    pub fn new(router: axum::Router) -> Self {
        Self::with_path(router, "/graphql")
    }

    pub fn with_path(router: axum::Router, path: impl Into<String>) -> Self {
        AxumTestClient {
            router,
            path: path.into(),
        }
    }

    /// Sends a request with a custom method, headers or body and reads the body as text.
    pub async fn raw(&self, request: http::Request<Bytes>) -> (http::StatusCode, http::HeaderMap, String) {
        let response = self.send(request).await;
        let (parts, body) = response.into_parts();
        (parts.status, parts.headers, String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl GraphqlTestClient for AxumTestClient {
    fn path(&self) -> &str {
        &self.path
    }

    async fn send(&self, request: http::Request<Bytes>) -> http::Response<Bytes> {
        let request = request.map(axum::body::Body::from);
        let response = self.router.clone().oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        http::Response::from_parts(parts, bytes)
    }
}
