//! Turns a GraphQL document into an operation the engine can execute.
//!
//! [Operation::parse] parses the document, validates it against the schema, selects the
//! operation to run and checks the operation limits. Those steps only depend on the document
//! and could be cached. [Operation::bind] then applies the request variables.

mod bind;
mod literal;
mod model;
mod parse;
mod validation;

use error::GraphqlError;
use schema::{OperationLimits, Schema};
use serde_json::{Map, Value};

pub use model::*;

use parse::ParsedOperation;

pub struct Operation {
    parsed: ParsedOperation,
}

impl Operation {
    pub fn parse(schema: &Schema, operation_name: Option<&str>, document: &str) -> Result<Self, Vec<GraphqlError>> {
        Self::parse_with_limits(schema, schema.operation_limits(), operation_name, document)
    }

    /// Same as [Operation::parse] with limits other than the schema ones.
    pub fn parse_with_limits(
        schema: &Schema,
        limits: &OperationLimits,
        operation_name: Option<&str>,
        document: &str,
    ) -> Result<Self, Vec<GraphqlError>> {
        let document = parse::parse_document(document).map_err(|err| vec![err])?;

        let errors = validation::validate(schema, &document);
        if !errors.is_empty() {
            return Err(errors);
        }

        let parsed = parse::select_operation(document, operation_name).map_err(|err| vec![err])?;
        bind::root_type(schema, &parsed).map_err(|err| vec![err.into()])?;
        validation::limits::validate(limits, &parsed).map_err(|err| vec![err.into()])?;

        Ok(Operation { parsed })
    }

    pub fn ty(&self) -> OperationType {
        self.parsed.definition.node.ty
    }

    pub fn name(&self) -> Option<&str> {
        self.parsed.name.as_deref()
    }

    /// Coerces the variables and flattens the selection sets. Every invalid variable is
    /// reported.
    pub fn bind(&self, schema: &Schema, variables: Map<String, Value>) -> Result<BoundOperation, Vec<GraphqlError>> {
        bind::bind(schema, &self.parsed, variables).map_err(|errors| errors.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("ty", &self.ty())
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
