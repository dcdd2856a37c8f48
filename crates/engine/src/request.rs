use schema::{Data, UploadFile, UPLOAD_PLACEHOLDER_PREFIX};
use serde_json::{Map, Value};

/// A GraphQL request as sent by clients, plus what the transport adds to it.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extensions: Map<String, Value>,
    /// Parent value of the root fields.
    #[serde(skip)]
    pub root_value: Value,
    #[serde(skip)]
    pub data: Data,
    #[serde(skip)]
    pub uploads: Vec<UploadFile>,
    /// GET requests must not run mutations.
    #[serde(skip, default = "allowed")]
    pub mutations_allowed: bool,
}

fn allowed() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid upload path '{0}'")]
pub struct UploadPathError(pub String);

impl Default for Request {
    fn default() -> Self {
        Request {
            query: String::new(),
            operation_name: None,
            variables: Map::new(),
            extensions: Map::new(),
            root_value: Value::Null,
            data: Data::default(),
            uploads: Vec::new(),
            mutations_allowed: true,
        }
    }
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Request {
            query: query.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn root_value(mut self, root_value: Value) -> Self {
        self.root_value = root_value;
        self
    }

    #[must_use]
    pub fn data<D: std::any::Any + Send + Sync>(mut self, data: D) -> Self {
        self.data.insert(data);
        self
    }

    /// Attaches a file to the variable at `var_path`, `variables.file` or `variables.files.0`
    /// as in the multipart request `map`. The variable must exist, usually as `null`.
    pub fn set_upload(&mut self, var_path: &str, file: UploadFile) -> Result<(), UploadPathError> {
        let invalid = || UploadPathError(var_path.to_string());
        let mut segments = var_path.split('.');
        if segments.next() != Some("variables") {
            return Err(invalid());
        }
        let name = segments.next().ok_or_else(invalid)?;
        let mut target = self.variables.get_mut(name).ok_or_else(invalid)?;
        for segment in segments {
            target = match target {
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get_mut(index)),
                Value::Object(fields) => fields.get_mut(segment),
                _ => None,
            }
            .ok_or_else(invalid)?;
        }

        *target = Value::String(format!("{UPLOAD_PLACEHOLDER_PREFIX}{}", self.uploads.len()));
        self.uploads.push(file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn file(name: &str) -> UploadFile {
        UploadFile {
            filename: name.to_string(),
            content_type: Some("text/plain".to_string()),
            content: Bytes::from_static(b"strawberry"),
        }
    }

    #[test]
    fn deserialize() {
        let request: Request = serde_json::from_value(json!({
            "query": "{ hello }",
            "operationName": null,
            "variables": null
        }))
        .unwrap();
        assert_eq!(request.query, "{ hello }");
        assert_eq!(request.operation_name, None);
        assert!(request.variables.is_empty());
        assert!(request.mutations_allowed);
    }

    #[test]
    fn uploads() {
        let mut request = Request::new("mutation ($file: Upload!, $files: [Upload!]!) { a }").variables(
            json!({"file": null, "files": [null, null]})
                .as_object()
                .cloned()
                .unwrap(),
        );
        request.set_upload("variables.file", file("a.txt")).unwrap();
        request.set_upload("variables.files.1", file("b.txt")).unwrap();

        assert_eq!(
            Value::Object(request.variables.clone()),
            json!({
                "file": "#__graphql_file__:0",
                "files": [null, "#__graphql_file__:1"]
            })
        );
        assert_eq!(request.uploads.len(), 2);

        assert_eq!(
            request.set_upload("variables.files.2", file("c.txt")),
            Err(UploadPathError("variables.files.2".to_string()))
        );
        assert_eq!(
            request.set_upload("file", file("c.txt")),
            Err(UploadPathError("file".to_string()))
        );
    }
}
