use async_graphql_parser::{
    types::{Field, FragmentSpread, InlineFragment, Selection, SelectionSet},
    Pos, Positioned,
};
use error::GraphqlError;
use schema::OperationLimits;

use crate::parse::{location, ParsedOperation};

type LimitResult<T> = Result<T, LimitError>;

#[derive(thiserror::Error, Debug, Clone)]
pub(crate) enum LimitError {
    #[error("Query is too complex.")]
    QueryTooComplex { complexity: usize, pos: Pos },
    #[error("Query contains too many root fields.")]
    QueryContainsTooManyRootFields { count: usize, pos: Pos },
    #[error("Query contains too many aliases.")]
    QueryContainsTooManyAliases { count: usize, pos: Pos },
    #[error("Query is nested too deep.")]
    QueryTooDeep { depth: usize, pos: Pos },
}

impl LimitError {
    pub fn pos(&self) -> Pos {
        match self {
            LimitError::QueryTooComplex { pos, .. }
            | LimitError::QueryContainsTooManyRootFields { pos, .. }
            | LimitError::QueryContainsTooManyAliases { pos, .. }
            | LimitError::QueryTooDeep { pos, .. } => *pos,
        }
    }

    /// The count that went over the limit.
    pub fn measured(&self) -> usize {
        match self {
            LimitError::QueryTooComplex { complexity: count, .. }
            | LimitError::QueryContainsTooManyRootFields { count, .. }
            | LimitError::QueryContainsTooManyAliases { count, .. }
            | LimitError::QueryTooDeep { depth: count, .. } => *count,
        }
    }
}

impl From<LimitError> for GraphqlError {
    fn from(err: LimitError) -> Self {
        tracing::debug!(measured = err.measured(), "{err}");
        GraphqlError::validation(err.to_string()).with_location(location(err.pos()))
    }
}

pub(crate) fn validate(limits: &OperationLimits, operation: &ParsedOperation) -> LimitResult<()> {
    if limits.is_unlimited() {
        return Ok(());
    }

    let max = |limit: Option<u16>| limit.map(Into::into).unwrap_or(usize::MAX);
    Visitor {
        operation,
        current_fragments_stack: Vec::new(),
        root_fields: 0,
        max_root_fields: max(limits.root_fields),
        current_depth: 0,
        max_depth: max(limits.depth),
        aliases_count: 0,
        max_aliases_count: max(limits.aliases),
        complexity: 0,
        max_complexity: max(limits.complexity),
    }
    .visit_selection_set(&operation.definition.node.selection_set)
}

struct Visitor<'p> {
    operation: &'p ParsedOperation,
    current_fragments_stack: Vec<&'p str>,
    root_fields: usize,
    max_root_fields: usize,
    current_depth: usize,
    max_depth: usize,
    aliases_count: usize,
    max_aliases_count: usize,
    complexity: usize,
    max_complexity: usize,
}

impl<'p> Visitor<'p> {
    fn visit_selection_set(&mut self, selection_set: &'p Positioned<SelectionSet>) -> LimitResult<()> {
        for item in &selection_set.node.items {
            match &item.node {
                Selection::Field(field) => {
                    self.root_fields += usize::from(self.current_depth == 0);
                    if self.root_fields > self.max_root_fields {
                        return Err(LimitError::QueryContainsTooManyRootFields {
                            count: self.root_fields,
                            pos: selection_set.pos,
                        });
                    }
                    self.complexity += 1;
                    if self.complexity > self.max_complexity {
                        return Err(LimitError::QueryTooComplex {
                            complexity: self.complexity,
                            pos: field.pos,
                        });
                    }
                    self.visit_field(field)?;
                }
                Selection::FragmentSpread(fragment_spread) => self.visit_fragment_spread(fragment_spread)?,
                Selection::InlineFragment(inline_fragment) => self.visit_inline_fragment(inline_fragment)?,
            }
        }

        Ok(())
    }

    fn visit_field(&mut self, field: &'p Positioned<Field>) -> LimitResult<()> {
        if let Some(alias) = &field.node.alias {
            self.aliases_count += 1;
            if self.aliases_count > self.max_aliases_count {
                return Err(LimitError::QueryContainsTooManyAliases {
                    count: self.aliases_count,
                    pos: alias.pos,
                });
            }
        }
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(LimitError::QueryTooDeep {
                depth: self.current_depth,
                pos: field.node.name.pos,
            });
        }

        self.visit_selection_set(&field.node.selection_set)?;
        self.current_depth -= 1;

        Ok(())
    }

    fn visit_fragment_spread(&mut self, fragment_spread: &'p Positioned<FragmentSpread>) -> LimitResult<()> {
        let fragment_name = fragment_spread.node.fragment_name.node.as_str();
        // Cycles and unknown fragments are reported by document validation.
        if self.current_fragments_stack.contains(&fragment_name) {
            return Ok(());
        }
        let Some(fragment) = self.operation.get_fragment(fragment_name) else {
            return Ok(());
        };

        self.current_fragments_stack.push(fragment_name);
        self.visit_selection_set(&fragment.node.selection_set)?;
        self.current_fragments_stack.pop();

        Ok(())
    }

    fn visit_inline_fragment(&mut self, inline_fragment: &'p Positioned<InlineFragment>) -> LimitResult<()> {
        self.visit_selection_set(&inline_fragment.node.selection_set)
    }
}
