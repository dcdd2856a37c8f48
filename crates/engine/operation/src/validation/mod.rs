//! Validation of the whole document against the schema, collecting every error like
//! graphql-js does. Operation limits are checked separately on the selected operation.

mod arguments;
mod directives;
mod fields;
mod fragments;
pub(crate) mod limits;
mod overlap;
mod suggestion;
mod variables;

use std::collections::HashSet;

use async_graphql_parser::{
    types::{ExecutableDocument, FragmentDefinition, OperationType},
    Pos, Positioned,
};
use error::GraphqlError;
use schema::Schema;

use crate::parse::location;

pub(crate) struct ValidationContext<'a> {
    pub schema: &'a Schema,
    pub document: &'a ExecutableDocument,
    errors: Vec<GraphqlError>,
    reported_conflicts: HashSet<(Pos, Pos)>,
}

impl<'a> ValidationContext<'a> {
    /// Fragment definitions in document order.
    pub fn fragments(&self) -> Vec<(&'a str, &'a Positioned<FragmentDefinition>)> {
        let mut fragments: Vec<_> = self
            .document
            .fragments
            .iter()
            .map(|(name, fragment)| (name.as_str(), fragment))
            .collect();
        fragments.sort_by_key(|(_, fragment)| (fragment.pos.line, fragment.pos.column));
        fragments
    }

    pub fn push_error(&mut self, message: impl Into<String>, positions: impl IntoIterator<Item = Pos>) {
        self.errors
            .push(GraphqlError::validation(message.into()).with_locations(positions.into_iter().map(location)));
    }
}

pub(crate) fn validate(schema: &Schema, document: &ExecutableDocument) -> Vec<GraphqlError> {
    let mut ctx = ValidationContext {
        schema,
        document,
        errors: Vec::new(),
        reported_conflicts: HashSet::new(),
    };

    fragments::validate_definitions(&mut ctx);

    let mut operations: Vec<_> = document.operations.iter().collect();
    operations.sort_by_key(|(_, operation)| (operation.pos.line, operation.pos.column));

    for (name, operation) in operations {
        let name = name.map(|name| name.as_str());
        variables::validate_definitions(&mut ctx, operation);
        directives::validate(&mut ctx, &operation.node.directives, directives::operation_location(operation));

        let root_type = match operation.node.ty {
            OperationType::Query => Some(schema.query_type()),
            OperationType::Mutation => schema.mutation_type(),
            OperationType::Subscription => None,
        };
        if let Some(root_type) = root_type {
            fields::validate_selection_set(&mut ctx, root_type, &operation.node.selection_set);
            variables::validate_usages(&mut ctx, name, operation, root_type);
        }
    }

    for (_, fragment) in ctx.fragments() {
        let type_condition = fragment.node.type_condition.node.on.node.as_str();
        if schema.object(type_condition).is_some() {
            fields::validate_selection_set(&mut ctx, type_condition, &fragment.node.selection_set);
        }
    }

    let errors = ctx.errors;
    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "operation validation failed");
    }
    errors
}

#[cfg(test)]
mod tests;
