use std::collections::HashMap;

use async_graphql_parser::{Pos, Positioned};
use async_graphql_value::{Name, Value};
use indexmap::IndexMap;
use schema::InputValueDefinition;

use super::{suggestion, ValidationContext};
use crate::literal::coerce_literal;

#[derive(Clone, Copy)]
pub(super) enum ArgumentOwner<'a> {
    Field { parent_type: &'a str, name: &'a str },
    Directive(&'a str),
}

/// Known argument names, unique argument names, provided required arguments and values of
/// correct type.
pub(super) fn validate(
    ctx: &mut ValidationContext<'_>,
    owner: ArgumentOwner<'_>,
    owner_pos: Pos,
    arguments: &[(Positioned<Name>, Positioned<Value>)],
    definitions: &IndexMap<String, InputValueDefinition>,
) {
    let mut seen = HashMap::<&str, Pos>::new();
    for (name, value) in arguments {
        if let Some(first) = seen.insert(name.node.as_str(), name.pos) {
            ctx.push_error(
                format!("There can be only one argument named '{}'.", name.node),
                [first, name.pos],
            );
            continue;
        }

        let Some(definition) = definitions.get(name.node.as_str()) else {
            let suggestions = suggestion::suggestion_list(name.node.as_str(), definitions.keys().map(String::as_str));
            let message = match owner {
                ArgumentOwner::Field {
                    parent_type,
                    name: field,
                } => format!("Unknown argument '{}' on field '{parent_type}.{field}'.", name.node),
                ArgumentOwner::Directive(directive) => {
                    format!("Unknown argument '{}' on directive '@{directive}'.", name.node)
                }
            };
            ctx.push_error(message + &suggestion::did_you_mean(&suggestions), [name.pos]);
            continue;
        };

        if let Err(err) = coerce_literal(ctx.schema, &definition.ty, &value.node, None) {
            ctx.push_error(err.to_string(), [value.pos]);
        }
    }

    for definition in definitions.values() {
        let is_required = definition.ty.is_non_null() && definition.default_value.is_none();
        if !is_required || seen.contains_key(definition.name.as_str()) {
            continue;
        }
        let message = match owner {
            ArgumentOwner::Field { name, .. } => format!(
                "Field '{name}' argument '{}' of type '{}' is required, but it was not provided.",
                definition.name, definition.ty
            ),
            ArgumentOwner::Directive(directive) => format!(
                "Directive '@{directive}' argument '{}' of type '{}' is required, but it was not provided.",
                definition.name, definition.ty
            ),
        };
        ctx.push_error(message, [owner_pos]);
    }
}
