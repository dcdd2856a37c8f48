use std::{fmt, future::Future, sync::Arc};

use bytes::Bytes;
use error::ErrorPath;
use futures_util::{future::BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Data, FieldDefinition, Schema};

pub type FieldResult<T> = Result<T, FieldError>;

/// Error returned by a resolver. Anything implementing `Display` converts into it, so resolvers
/// can use `?` on their own errors.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub message: String,
    pub extensions: Vec<(String, Value)>,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        FieldError {
            message: message.into(),
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.push((key.into(), value.into()));
        self
    }
}

impl<E: fmt::Display> From<E> for FieldError {
    fn from(error: E) -> Self {
        FieldError::new(error.to_string())
    }
}

pub type SyncResolverFn = Arc<dyn Fn(&ResolverContext) -> FieldResult<Value> + Send + Sync>;
pub type AsyncResolverFn = Arc<dyn Fn(ResolverContext) -> BoxFuture<'static, FieldResult<Value>> + Send + Sync>;

/// How a field computes its value.
#[derive(Clone, Default)]
pub enum Resolver {
    /// Reads the field from the parent object, falling back on the field default value.
    #[default]
    Default,
    Sync(SyncResolverFn),
    Async(AsyncResolverFn),
}

impl Resolver {
    pub fn sync<F>(resolver: F) -> Self
    where
        F: Fn(&ResolverContext) -> FieldResult<Value> + Send + Sync + 'static,
    {
        Resolver::Sync(Arc::new(resolver))
    }

    pub fn from_async<F, Fut>(resolver: F) -> Self
    where
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult<Value>> + Send + 'static,
    {
        Resolver::Async(Arc::new(move |ctx| resolver(ctx).boxed()))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Resolver::Async(_))
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolver::Default => f.write_str("Default"),
            Resolver::Sync(_) => f.write_str("Sync"),
            Resolver::Async(_) => f.write_str("Async"),
        }
    }
}

/// Variables holding an upload are replaced by this prefix followed by the index of the file
/// in the request uploads.
pub const UPLOAD_PLACEHOLDER_PREFIX: &str = "#__graphql_file__:";

/// A file sent with a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

/// State shared by every field of a request.
#[derive(Clone, Default)]
pub struct RequestScope {
    pub data: Arc<Data>,
    pub uploads: Arc<Vec<UploadFile>>,
}

/// Everything a resolver or a permission knows about the field being resolved.
///
/// Cheap to clone, async resolvers receive it by value.
#[derive(Clone)]
pub struct ResolverContext {
    schema: Arc<Schema>,
    scope: RequestScope,
    parent_type: Arc<str>,
    field_name: Arc<str>,
    parent: Arc<Value>,
    arguments: Arc<Map<String, Value>>,
    path: ErrorPath,
}

impl ResolverContext {
    pub fn new(
        schema: Arc<Schema>,
        scope: RequestScope,
        parent_type: &str,
        field_name: &str,
        parent: Arc<Value>,
        arguments: Arc<Map<String, Value>>,
        path: ErrorPath,
    ) -> Self {
        ResolverContext {
            schema,
            scope,
            parent_type: parent_type.into(),
            field_name: field_name.into(),
            parent,
            arguments,
            path,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Value of the parent object, the root value for root fields.
    pub fn parent(&self) -> &Value {
        &self.parent
    }

    pub fn parent_type(&self) -> &str {
        &self.parent_type
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field(&self) -> Option<&FieldDefinition> {
        self.schema.field(&self.parent_type, &self.field_name)
    }

    pub fn path(&self) -> &ErrorPath {
        &self.path
    }

    /// Arguments after coercion, defaults included.
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// Deserializes an argument. A missing or null argument is `None`.
    pub fn argument<T: DeserializeOwned>(&self, name: &str) -> FieldResult<Option<T>> {
        match self.arguments.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| FieldError::new(format!("Invalid argument '{name}': {err}"))),
        }
    }

    pub fn data<D: std::any::Any + Send + Sync>(&self) -> Option<&D> {
        self.scope.data.get::<D>()
    }

    /// The file behind an `Upload` argument.
    pub fn upload(&self, name: &str) -> Option<&UploadFile> {
        self.arguments.get(name).and_then(|value| self.resolve_upload(value))
    }

    /// The file behind an upload placeholder, for uploads nested in lists.
    pub fn resolve_upload(&self, value: &Value) -> Option<&UploadFile> {
        let index = value
            .as_str()?
            .strip_prefix(UPLOAD_PLACEHOLDER_PREFIX)?
            .parse::<usize>()
            .ok()?;
        self.scope.uploads.get(index)
    }
}

impl fmt::Debug for ResolverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverContext")
            .field("parent_type", &self.parent_type)
            .field("field_name", &self.field_name)
            .field("path", &self.path)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
