mod code;
mod location;
mod path;

pub use code::*;
pub use location::*;
pub use path::*;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlError {
    pub message: Cow<'static, str>,
    pub code: ErrorCode,
    pub locations: Vec<Location>,
    pub path: Option<ErrorPath>,
    // Serialized as a map, but kept as a Vec for efficiency.
    pub extensions: Vec<(Cow<'static, str>, serde_json::Value)>,
}

impl GraphqlError {
    pub fn new(message: impl Into<Cow<'static, str>>, code: ErrorCode) -> Self {
        GraphqlError {
            message: message.into(),
            code,
            locations: Vec::new(),
            path: None,
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.locations.extend(locations);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: ErrorPath) -> Self {
        self.path = Some(path);
        self
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_extensions(
        mut self,
        extensions: impl IntoIterator<Item = (impl Into<Cow<'static, str>>, impl Into<serde_json::Value>)>,
    ) -> Self {
        for (key, value) in extensions {
            self.extensions.push((key.into(), value.into()));
        }
        self
    }

    pub fn parsing(message: impl Into<Cow<'static, str>>) -> Self {
        GraphqlError::new(message, ErrorCode::OperationParsingError)
    }

    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        GraphqlError::new(message, ErrorCode::OperationValidationError)
    }

    pub fn variable(message: impl Into<Cow<'static, str>>) -> Self {
        GraphqlError::new(message, ErrorCode::VariableError)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        GraphqlError::new(message, ErrorCode::Unauthorized)
    }

    pub fn internal_server_error() -> Self {
        GraphqlError::new("Internal server error", ErrorCode::InternalServerError)
    }

    /// Renders the error the way it's written to logs, see [ErrorReport].
    pub fn report<'a>(&'a self, document: &'a str) -> ErrorReport<'a> {
        ErrorReport { error: self, document }
    }
}

impl std::fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}

impl serde::Serialize for GraphqlError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("message", &self.message)?;
        if !self.locations.is_empty() {
            map.serialize_entry("locations", &self.locations)?;
        }
        if let Some(path) = &self.path {
            map.serialize_entry("path", path)?;
        }
        map.serialize_entry("extensions", &SerializableExtensions(self))?;
        map.end()
    }
}

struct SerializableExtensions<'a>(&'a GraphqlError);

impl serde::Serialize for SerializableExtensions<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let error = self.0;
        let mut map = serializer.serialize_map(Some(error.extensions.len() + 1))?;
        for (key, value) in &error.extensions {
            if key != "code" {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry("code", &error.code)?;
        map.end()
    }
}

/// Error as written to the logs.
///
/// Errors raised while preparing the operation point into the document, so we print the source
/// excerpt of each location after the message. Errors raised during execution are logged with
/// their message only.
pub struct ErrorReport<'a> {
    error: &'a GraphqlError,
    document: &'a str,
}

impl std::fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error.message)?;
        if self.error.code.is_request_error() {
            for location in &self.error.locations {
                write!(f, "\n\n{}", print_location(self.document, *location))?;
            }
        }
        Ok(())
    }
}
