use std::collections::{HashMap, HashSet};

use async_graphql_parser::{
    types::{Directive, OperationDefinition, Selection, SelectionSet},
    Pos, Positioned,
};
use async_graphql_value::{Name, Value};
use indexmap::IndexMap;
use schema::{DirectiveLocation, InputValueDefinition, TypeRef};

use super::{directives, suggestion, ValidationContext};
use crate::literal::{coerce_literal, type_ref};

/// Unique variable names, input types and default values of the right type.
pub(super) fn validate_definitions(ctx: &mut ValidationContext<'_>, operation: &Positioned<OperationDefinition>) {
    let mut seen = HashMap::<&str, Pos>::new();

    for definition in &operation.node.variable_definitions {
        let name = definition.node.name.node.as_str();
        if let Some(first) = seen.insert(name, definition.node.name.pos) {
            ctx.push_error(
                format!("There can be only one variable named '${name}'."),
                [first, definition.node.name.pos],
            );
        }

        directives::validate(ctx, &definition.node.directives, DirectiveLocation::VariableDefinition);

        let ty = type_ref(&definition.node.var_type.node);
        match ctx.schema.type_definition(ty.named_type()) {
            None => {
                let suggestions =
                    suggestion::suggestion_list(ty.named_type(), ctx.schema.types().map(|ty| ty.name()));
                ctx.push_error(
                    format!(
                        "Unknown type '{}'.{}",
                        ty.named_type(),
                        suggestion::did_you_mean(&suggestions)
                    ),
                    [definition.node.var_type.pos],
                );
            }
            Some(definition_type) if !definition_type.is_input() => ctx.push_error(
                format!("Variable '${name}' cannot be non-input type '{ty}'."),
                [definition.node.var_type.pos],
            ),
            Some(_) => {
                if let Some(default_value) = &definition.node.default_value {
                    let value = default_value.node.clone().into_value();
                    if let Err(err) = coerce_literal(ctx.schema, &ty, &value, None) {
                        ctx.push_error(err.to_string(), [default_value.pos]);
                    }
                }
            }
        }
    }
}

struct Usage<'s> {
    name: &'s str,
    pos: Pos,
    /// Unknown inside custom scalar literals.
    expected: Option<TypeRef>,
    has_location_default: bool,
}

/// Every variable used is defined, every variable defined is used, and used where its type fits.
pub(super) fn validate_usages(
    ctx: &mut ValidationContext<'_>,
    operation_name: Option<&str>,
    operation: &Positioned<OperationDefinition>,
    root_type: &str,
) {
    let mut usages = Vec::new();
    let mut entered = HashSet::new();
    collect_usages(ctx, root_type, &operation.node.selection_set, &mut entered, &mut usages);
    collect_directive_usages(ctx, &operation.node.directives, &mut usages);

    let mut definitions = IndexMap::new();
    for definition in &operation.node.variable_definitions {
        definitions
            .entry(definition.node.name.node.as_str())
            .or_insert(definition);
    }

    for usage in &usages {
        let Some(definition) = definitions.get(usage.name) else {
            let message = match operation_name {
                Some(operation_name) => {
                    format!("Variable '${}' is not defined by operation '{operation_name}'.", usage.name)
                }
                None => format!("Variable '${}' is not defined.", usage.name),
            };
            ctx.push_error(message, [usage.pos, operation.pos]);
            continue;
        };

        let Some(expected) = &usage.expected else {
            continue;
        };
        let variable_type = type_ref(&definition.node.var_type.node);
        let has_default = definition
            .node
            .default_value
            .as_ref()
            .is_some_and(|value| !matches!(value.node, async_graphql_value::ConstValue::Null));

        let allowed = if expected.is_non_null() && !variable_type.is_non_null() {
            (has_default || usage.has_location_default) && variable_type.is_subtype_of(expected.nullable())
        } else {
            variable_type.is_subtype_of(expected)
        };
        if !allowed {
            ctx.push_error(
                format!(
                    "Variable '${}' of type '{variable_type}' used in position expecting type '{expected}'.",
                    usage.name
                ),
                [definition.pos, usage.pos],
            );
        }
    }

    let used: HashSet<&str> = usages.iter().map(|usage| usage.name).collect();
    for (name, definition) in definitions {
        if used.contains(name) {
            continue;
        }
        let message = match operation_name {
            Some(operation_name) => format!("Variable '${name}' is never used in operation '{operation_name}'."),
            None => format!("Variable '${name}' is never used."),
        };
        ctx.push_error(message, [definition.pos]);
    }
}

fn collect_usages<'s>(
    ctx: &ValidationContext<'s>,
    parent_type: &str,
    selection_set: &'s Positioned<SelectionSet>,
    entered: &mut HashSet<&'s str>,
    usages: &mut Vec<Usage<'s>>,
) {
    for item in &selection_set.node.items {
        match &item.node {
            Selection::Field(field) => {
                collect_directive_usages(ctx, &field.node.directives, usages);
                let definition = ctx.schema.field(parent_type, field.node.name.node.as_str());
                collect_argument_usages(
                    &field.node.arguments,
                    definition.map(|definition| &definition.arguments),
                    usages,
                );
                let child_type = definition.map(|definition| definition.ty.named_type()).unwrap_or_default();
                collect_usages(ctx, child_type, &field.node.selection_set, entered, usages);
            }
            Selection::FragmentSpread(spread) => {
                collect_directive_usages(ctx, &spread.node.directives, usages);
                let name = spread.node.fragment_name.node.as_str();
                let Some(fragment) = ctx.document.fragments.get(name) else {
                    continue;
                };
                if entered.insert(name) {
                    collect_directive_usages(ctx, &fragment.node.directives, usages);
                    let type_condition = fragment.node.type_condition.node.on.node.as_str();
                    collect_usages(ctx, type_condition, &fragment.node.selection_set, entered, usages);
                }
            }
            Selection::InlineFragment(inline_fragment) => {
                collect_directive_usages(ctx, &inline_fragment.node.directives, usages);
                let parent_type = inline_fragment
                    .node
                    .type_condition
                    .as_ref()
                    .map(|condition| condition.node.on.node.as_str())
                    .unwrap_or(parent_type);
                collect_usages(ctx, parent_type, &inline_fragment.node.selection_set, entered, usages);
            }
        }
    }
}

fn collect_directive_usages<'s>(
    ctx: &ValidationContext<'_>,
    directives: &'s [Positioned<Directive>],
    usages: &mut Vec<Usage<'s>>,
) {
    for directive in directives {
        let definition = ctx.schema.directive(directive.node.name.node.as_str());
        collect_argument_usages(
            &directive.node.arguments,
            definition.map(|definition| &definition.arguments),
            usages,
        );
    }
}

fn collect_argument_usages<'s>(
    arguments: &'s [(Positioned<Name>, Positioned<Value>)],
    definitions: Option<&IndexMap<String, InputValueDefinition>>,
    usages: &mut Vec<Usage<'s>>,
) {
    for (name, value) in arguments {
        let definition = definitions.and_then(|definitions| definitions.get(name.node.as_str()));
        collect_value_usages(
            &value.node,
            value.pos,
            definition.map(|definition| definition.ty.clone()),
            definition.is_some_and(|definition| definition.default_value.is_some()),
            usages,
        );
    }
}

fn collect_value_usages<'s>(
    value: &'s Value,
    pos: Pos,
    expected: Option<TypeRef>,
    has_location_default: bool,
    usages: &mut Vec<Usage<'s>>,
) {
    match value {
        Value::Variable(name) => usages.push(Usage {
            name: name.as_str(),
            pos,
            expected,
            has_location_default,
        }),
        Value::List(items) => {
            let item_type = expected.and_then(|ty| match ty.nullable() {
                TypeRef::List(inner) => Some(inner.as_ref().clone()),
                _ => None,
            });
            for item in items {
                collect_value_usages(item, pos, item_type.clone(), false, usages);
            }
        }
        Value::Object(fields) => {
            for value in fields.values() {
                collect_value_usages(value, pos, None, false, usages);
            }
        }
        _ => (),
    }
}
