use std::sync::Arc;

pub use async_graphql_parser::types::OperationType;
use error::Location;
use serde_json::{Map, Value};

/// An operation bound to the schema and the request variables, ready to be executed.
#[derive(Debug, Clone)]
pub struct BoundOperation {
    pub ty: OperationType,
    pub name: Option<String>,
    pub root_type: String,
    pub selection_set: Vec<BoundField>,
}

/// A field after fragments were flattened, `@skip`/`@include` applied and fields sharing a
/// response key merged.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    pub response_key: String,
    pub name: String,
    pub location: Location,
    /// Coerced arguments, defaults included. Arguments without value nor default are absent.
    pub arguments: Arc<Map<String, Value>>,
    pub selection_set: Vec<BoundField>,
}

impl BoundField {
    pub fn is_leaf(&self) -> bool {
        self.selection_set.is_empty()
    }
}
