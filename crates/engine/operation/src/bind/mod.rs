mod error;
mod variables;

use std::{collections::HashSet, sync::Arc};

use async_graphql_parser::{
    types::{Directive, Field, OperationType, Selection, SelectionSet},
    Pos, Positioned,
};
use async_graphql_value::{Name, Value};
use indexmap::IndexMap;
use schema::{FieldDefinition, InputValueDefinition, Schema, TypeRef};
use serde_json::{Map, Value as JsonValue};

pub(crate) use error::*;

use crate::{
    literal::coerce_literal,
    model::{BoundField, BoundOperation},
    parse::{location, ParsedOperation},
};

/// Root object type of the operation, if the schema defines one.
pub(crate) fn root_type<'s>(schema: &'s Schema, operation: &ParsedOperation) -> BindResult<&'s str> {
    let pos = operation.definition.pos;
    match operation.definition.node.ty {
        OperationType::Query => Ok(schema.query_type()),
        OperationType::Mutation => schema.mutation_type().ok_or(BindError::NoMutationDefined { pos }),
        OperationType::Subscription => Err(BindError::NoSubscriptionDefined { pos }),
    }
}

pub(crate) fn bind(
    schema: &Schema,
    operation: &ParsedOperation,
    variables: Map<String, JsonValue>,
) -> Result<BoundOperation, Vec<BindError>> {
    let root_type = root_type(schema, operation).map_err(|err| vec![err])?;
    let variables = variables::coerce_variables(schema, &operation.definition, variables)?;

    let binder = Binder {
        schema,
        operation,
        variables,
    };
    let selection_set = binder
        .bind_merged_selection_sets(root_type, &[&operation.definition.node.selection_set])
        .map_err(|err| vec![err])?;

    Ok(BoundOperation {
        ty: operation.definition.node.ty,
        name: operation.name.clone(),
        root_type: root_type.to_string(),
        selection_set,
    })
}

struct Binder<'s, 'p> {
    schema: &'s Schema,
    operation: &'p ParsedOperation,
    variables: Map<String, JsonValue>,
}

impl<'s, 'p> Binder<'s, 'p> {
    /// Fields of all selection sets are grouped by response key, the selection sets of fields
    /// sharing a key are merged in turn.
    fn bind_merged_selection_sets(
        &self,
        parent_type: &str,
        merged_selection_sets: &[&'p Positioned<SelectionSet>],
    ) -> BindResult<Vec<BoundField>> {
        let mut fields = IndexMap::<&'p str, Vec<&'p Positioned<Field>>>::new();
        let mut visited_fragments = HashSet::new();
        for selection_set in merged_selection_sets {
            self.collect_fields(parent_type, selection_set, &mut visited_fragments, &mut fields)?;
        }

        let mut bound_fields = Vec::with_capacity(fields.len());
        for (response_key, fields) in fields {
            let Some(field) = fields.first() else {
                continue;
            };
            let name = field.node.name.node.as_str();
            let Some(definition) = self.schema.field(parent_type, name) else {
                continue;
            };

            let selection_set = if fields.iter().any(|field| !field.node.selection_set.node.items.is_empty()) {
                let merged_selection_sets = fields.iter().map(|field| &field.node.selection_set).collect::<Vec<_>>();
                self.bind_merged_selection_sets(definition.ty.named_type(), &merged_selection_sets)?
            } else {
                Vec::new()
            };

            bound_fields.push(BoundField {
                response_key: response_key.to_string(),
                name: name.to_string(),
                location: location(field.pos),
                arguments: Arc::new(self.bind_field_arguments(field, definition)?),
                selection_set,
            });
        }

        Ok(bound_fields)
    }

    fn collect_fields(
        &self,
        parent_type: &str,
        selection_set: &'p Positioned<SelectionSet>,
        visited_fragments: &mut HashSet<&'p str>,
        fields: &mut IndexMap<&'p str, Vec<&'p Positioned<Field>>>,
    ) -> BindResult<()> {
        for item in &selection_set.node.items {
            match &item.node {
                Selection::Field(field) => {
                    if !self.should_include(&field.node.directives)? {
                        continue;
                    }
                    let response_key = field.node.alias.as_ref().unwrap_or(&field.node.name).node.as_str();
                    fields.entry(response_key).or_default().push(field);
                }
                Selection::FragmentSpread(spread) => {
                    if !self.should_include(&spread.node.directives)? {
                        continue;
                    }
                    let name = spread.node.fragment_name.node.as_str();
                    if !visited_fragments.insert(name) {
                        continue;
                    }
                    let Some(fragment) = self.operation.get_fragment(name) else {
                        continue;
                    };
                    if fragment.node.type_condition.node.on.node.as_str() != parent_type {
                        continue;
                    }
                    self.collect_fields(parent_type, &fragment.node.selection_set, visited_fragments, fields)?;
                }
                Selection::InlineFragment(inline_fragment) => {
                    if !self.should_include(&inline_fragment.node.directives)? {
                        continue;
                    }
                    let applies = match &inline_fragment.node.type_condition {
                        Some(condition) => condition.node.on.node.as_str() == parent_type,
                        None => true,
                    };
                    if applies {
                        self.collect_fields(
                            parent_type,
                            &inline_fragment.node.selection_set,
                            visited_fragments,
                            fields,
                        )?;
                    }
                }
            }
        }

        Ok(())
    }

    /// `@skip(if: true)` and `@include(if: false)` exclude a selection.
    fn should_include(&self, directives: &[Positioned<Directive>]) -> BindResult<bool> {
        for directive in directives {
            let skip_when = match directive.node.name.node.as_str() {
                "skip" => true,
                "include" => false,
                _ => continue,
            };
            let Some(definition) = self.schema.directive(directive.node.name.node.as_str()) else {
                continue;
            };
            let arguments = self.bind_arguments(&directive.node.arguments, &definition.arguments, directive.pos)?;
            if arguments.get("if").and_then(JsonValue::as_bool) == Some(skip_when) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn bind_field_arguments(
        &self,
        field: &Positioned<Field>,
        definition: &FieldDefinition,
    ) -> BindResult<Map<String, JsonValue>> {
        self.bind_arguments(&field.node.arguments, &definition.arguments, field.pos)
    }

    /// Coerced argument values, defaults included. An argument without value nor default is
    /// absent from the map.
    fn bind_arguments(
        &self,
        arguments: &[(Positioned<Name>, Positioned<Value>)],
        definitions: &IndexMap<String, InputValueDefinition>,
        owner_pos: Pos,
    ) -> BindResult<Map<String, JsonValue>> {
        let mut bound = Map::new();

        for (name, definition) in definitions {
            let ty = &definition.ty;
            let provided = arguments
                .iter()
                .find(|(argument_name, _)| argument_name.node.as_str() == name)
                .map(|(_, value)| value);

            let Some(value) = provided else {
                if let Some(default_value) = &definition.default_value {
                    bound.insert(name.clone(), default_value.clone());
                } else if ty.is_non_null() {
                    return Err(BindError::MissingArgument {
                        name: name.clone(),
                        ty: ty.to_string(),
                        pos: owner_pos,
                    });
                }
                continue;
            };

            if let Value::Variable(variable) = &value.node {
                if !self.variables.contains_key(variable.as_str()) {
                    if let Some(default_value) = &definition.default_value {
                        bound.insert(name.clone(), default_value.clone());
                    } else if ty.is_non_null() {
                        return Err(BindError::MissingArgumentVariable {
                            name: name.clone(),
                            ty: ty.to_string(),
                            variable: variable.to_string(),
                            pos: value.pos,
                        });
                    }
                    continue;
                }
            }

            match coerce_literal(self.schema, ty, &value.node, Some(&self.variables)) {
                Ok(Some(JsonValue::Null)) if ty.is_non_null() => {
                    return Err(null_argument(name, ty, value));
                }
                Ok(Some(coerced)) => {
                    bound.insert(name.clone(), coerced);
                }
                Ok(None) => (),
                Err(_) if matches!(value.node, Value::Null) && ty.is_non_null() => {
                    return Err(null_argument(name, ty, value));
                }
                Err(_) => {
                    return Err(BindError::InvalidArgumentValue {
                        name: name.clone(),
                        value: value.node.to_string(),
                        pos: value.pos,
                    })
                }
            }
        }

        Ok(bound)
    }
}

fn null_argument(name: &str, ty: &TypeRef, value: &Positioned<Value>) -> BindError {
    BindError::NullArgument {
        name: name.to_string(),
        ty: ty.to_string(),
        pos: value.pos,
    }
}
