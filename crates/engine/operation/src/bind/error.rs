use async_graphql_parser::Pos;
use error::GraphqlError;

use crate::parse::location;

pub(crate) type BindResult<T> = Result<T, BindError>;

#[derive(thiserror::Error, Debug, Clone)]
pub(crate) enum BindError {
    #[error("Schema is not configured to execute mutation operation.")]
    NoMutationDefined { pos: Pos },
    #[error("Schema is not configured to execute subscription operation.")]
    NoSubscriptionDefined { pos: Pos },
    #[error("Variable '${name}' of required type '{ty}' was not provided.")]
    MissingVariable { name: String, ty: String, pos: Pos },
    #[error("Variable '${name}' of non-null type '{ty}' must not be null.")]
    NullVariable { name: String, ty: String, pos: Pos },
    #[error("Variable '${name}' got invalid value {value}{}; {reason}", at(.name, .path))]
    InvalidVariableValue {
        name: String,
        value: String,
        path: Vec<usize>,
        reason: String,
        pos: Pos,
    },
    #[error("Argument '{name}' of required type '{ty}' was not provided.")]
    MissingArgument { name: String, ty: String, pos: Pos },
    #[error(
        "Argument '{name}' of required type '{ty}' was provided the variable '${variable}' which was not provided a runtime value."
    )]
    MissingArgumentVariable {
        name: String,
        ty: String,
        variable: String,
        pos: Pos,
    },
    #[error("Argument '{name}' of non-null type '{ty}' must not be null.")]
    NullArgument { name: String, ty: String, pos: Pos },
    #[error("Argument '{name}' has invalid value {value}.")]
    InvalidArgumentValue { name: String, value: String, pos: Pos },
}

fn at(name: &str, path: &[usize]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let indices: String = path.iter().map(|index| format!("[{index}]")).collect();
    format!(" at '{name}{indices}'")
}

impl BindError {
    pub fn pos(&self) -> Pos {
        match self {
            BindError::NoMutationDefined { pos }
            | BindError::NoSubscriptionDefined { pos }
            | BindError::MissingVariable { pos, .. }
            | BindError::NullVariable { pos, .. }
            | BindError::InvalidVariableValue { pos, .. }
            | BindError::MissingArgument { pos, .. }
            | BindError::MissingArgumentVariable { pos, .. }
            | BindError::NullArgument { pos, .. }
            | BindError::InvalidArgumentValue { pos, .. } => *pos,
        }
    }
}

impl From<BindError> for GraphqlError {
    fn from(err: BindError) -> Self {
        let error = match &err {
            BindError::NoMutationDefined { .. } | BindError::NoSubscriptionDefined { .. } => {
                GraphqlError::validation(err.to_string())
            }
            _ => GraphqlError::variable(err.to_string()),
        };
        error.with_location(location(err.pos()))
    }
}
