//! Configuration of the GraphQL HTTP view, usually read from a `sprig.toml` file:
//!
//! ```toml
//! path = "/graphql"
//! playground = true
//! allow_queries_via_get = true
//! execution = "async"
//! request_body_limit = 2097152
//!
//! [operation_limits]
//! depth = 10
//! ```

mod operation_limits;

use std::path::Path;

pub use operation_limits::OperationLimitsConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read the configuration file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("the GraphQL path must start with '/' and hold no route parameters, got '{0}'")]
    InvalidPath(String),
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Route of the GraphQL endpoint.
    pub path: String,
    /// Serve the GraphQL Playground to browsers.
    pub playground: bool,
    /// Accept queries sent as GET parameters. Mutations are always refused over GET.
    pub allow_queries_via_get: bool,
    pub execution: ExecutionMode,
    /// Maximum size of a request body in bytes.
    pub request_body_limit: usize,
    pub operation_limits: OperationLimitsConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            path: "/graphql".to_string(),
            playground: true,
            allow_queries_via_get: true,
            execution: ExecutionMode::default(),
            request_body_limit: 2 * 1024 * 1024,
            operation_limits: OperationLimitsConfig::default(),
        }
    }
}

/// How the view runs the engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Async resolvers are awaited on the request task.
    #[default]
    Async,
    /// Requests are executed on the blocking thread pool, async resolvers are not supported.
    Sync,
}

impl ViewConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&input)
    }

    /// Run by [ViewConfig::from_toml] and when the view is mounted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') || self.path.contains([':', '*', '{', '}']) {
            return Err(ConfigError::InvalidPath(self.path.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let config = ViewConfig::from_toml("").unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.path, "/graphql");
        assert_eq!(config.request_body_limit, 2_097_152);
        assert!(config.operation_limits.is_empty());
    }

    #[test]
    fn full() {
        let config = ViewConfig::from_toml(indoc! {r#"
            path = "/api/graphql"
            playground = false
            allow_queries_via_get = false
            execution = "sync"
            request_body_limit = 1024

            [operation_limits]
            depth = 5
            root_fields = 3
        "#})
        .unwrap();

        insta::assert_debug_snapshot!(config, @r###"
        ViewConfig {
            path: "/api/graphql",
            playground: false,
            allow_queries_via_get: false,
            execution: Sync,
            request_body_limit: 1024,
            operation_limits: OperationLimitsConfig {
                depth: Some(
                    5,
                ),
                aliases: None,
                root_fields: Some(
                    3,
                ),
                complexity: None,
            },
        }
        "###);
    }

    #[test]
    fn invalid() {
        let err = ViewConfig::from_toml("graphiql = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("unknown field `graphiql`"));

        let err = ViewConfig::from_toml(r#"execution = "threaded""#).unwrap_err();
        assert!(err.to_string().contains("unknown variant `threaded`"));

        let err = ViewConfig::from_toml(r#"path = "graphql""#).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"the GraphQL path must start with '/' and hold no route parameters, got 'graphql'"
        );

        let config = ViewConfig {
            path: "/graphql/:id".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPath(_))));
    }
}
