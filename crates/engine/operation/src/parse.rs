use std::collections::HashMap;

use async_graphql_parser::{
    types::{DocumentOperations, ExecutableDocument, FragmentDefinition, OperationDefinition},
    Pos, Positioned,
};
use async_graphql_value::Name;
use error::{GraphqlError, Location};

/// The operation selected from a validated document.
pub(crate) struct ParsedOperation {
    pub name: Option<String>,
    pub definition: Positioned<OperationDefinition>,
    pub fragments: HashMap<Name, Positioned<FragmentDefinition>>,
}

impl ParsedOperation {
    pub fn get_fragment(&self, name: &str) -> Option<&Positioned<FragmentDefinition>> {
        self.fragments.get(name)
    }
}

pub(crate) fn location(pos: Pos) -> Location {
    Location::new(
        u32::try_from(pos.line).unwrap_or(u32::MAX),
        u32::try_from(pos.column).unwrap_or(u32::MAX),
    )
}

pub(crate) fn parse_document(document: &str) -> Result<ExecutableDocument, GraphqlError> {
    async_graphql_parser::parse_query(document).map_err(|err| {
        let locations = err.positions().map(location).collect::<Vec<_>>();
        let error = match &err {
            async_graphql_parser::Error::Syntax { message, .. } => {
                GraphqlError::parsing(format!("Syntax Error: {}", syntax_error_reason(message)))
            }
            async_graphql_parser::Error::MultipleOperations { .. } => {
                GraphqlError::validation("This anonymous operation must be the only defined operation.")
            }
            async_graphql_parser::Error::OperationDuplicated { operation, .. } => {
                GraphqlError::validation(format!("There can be only one operation named '{operation}'."))
            }
            async_graphql_parser::Error::FragmentDuplicated { fragment, .. } => {
                GraphqlError::validation(format!("There can be only one fragment named '{fragment}'."))
            }
            async_graphql_parser::Error::MissingOperation => GraphqlError::validation("Must provide an operation."),
            err => GraphqlError::parsing(format!("Syntax Error: {err}")),
        };
        error.with_locations(locations)
    })
}

/// The parser renders errors with a source excerpt ending with `= expected <rule>`, only the
/// reason is kept since the location is reported separately.
fn syntax_error_reason(message: &str) -> &str {
    message
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("= "))
        .unwrap_or(message)
        .trim()
}

pub(crate) fn select_operation(
    document: ExecutableDocument,
    operation_name: Option<&str>,
) -> Result<ParsedOperation, GraphqlError> {
    let (name, definition) = match (document.operations, operation_name) {
        (DocumentOperations::Single(operation), None) => (None, operation),
        (DocumentOperations::Multiple(mut operations), Some(name)) => operations
            .remove(name)
            .map(|operation| (Some(name.to_string()), operation))
            .ok_or_else(|| unknown_operation(name))?,
        (DocumentOperations::Single(_), Some(name)) => return Err(unknown_operation(name)),
        (DocumentOperations::Multiple(operations), None) => {
            if operations.len() != 1 {
                return Err(GraphqlError::validation(
                    "Must provide operation name if query contains multiple operations.",
                ));
            }
            operations
                .into_iter()
                .next()
                .map(|(name, operation)| (Some(name.to_string()), operation))
                .ok_or_else(|| GraphqlError::validation("Must provide an operation."))?
        }
    };

    Ok(ParsedOperation {
        name,
        definition,
        fragments: document.fragments,
    })
}

fn unknown_operation(name: &str) -> GraphqlError {
    GraphqlError::validation(format!("Unknown operation named '{name}'."))
}
