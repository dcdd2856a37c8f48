use async_graphql_parser::{
    types::{Field, Selection, SelectionSet},
    Positioned,
};
use schema::DirectiveLocation;

use super::{
    arguments::{self, ArgumentOwner},
    directives, overlap, suggestion, ValidationContext,
};

/// Walks a selection set of an object type, checking fields, fragments spreads, inline fragments
/// and their directives.
pub(super) fn validate_selection_set(
    ctx: &mut ValidationContext<'_>,
    parent_type: &str,
    selection_set: &Positioned<SelectionSet>,
) {
    overlap::validate(ctx, parent_type, selection_set);

    for item in &selection_set.node.items {
        match &item.node {
            Selection::Field(field) => validate_field(ctx, parent_type, field),
            Selection::FragmentSpread(spread) => {
                directives::validate(ctx, &spread.node.directives, DirectiveLocation::FragmentSpread);

                let name = spread.node.fragment_name.node.as_str();
                let Some(fragment) = ctx.document.fragments.get(name) else {
                    ctx.push_error(format!("Unknown fragment '{name}'."), [spread.node.fragment_name.pos]);
                    continue;
                };
                let type_condition = fragment.node.type_condition.node.on.node.as_str();
                if ctx.schema.object(type_condition).is_some() && type_condition != parent_type {
                    ctx.push_error(
                        format!(
                            "Fragment '{name}' cannot be spread here as objects of type '{parent_type}' can never be of type '{type_condition}'."
                        ),
                        [spread.pos],
                    );
                }
            }
            Selection::InlineFragment(inline_fragment) => {
                directives::validate(
                    ctx,
                    &inline_fragment.node.directives,
                    DirectiveLocation::InlineFragment,
                );

                let Some(type_condition) = &inline_fragment.node.type_condition else {
                    validate_selection_set(ctx, parent_type, &inline_fragment.node.selection_set);
                    continue;
                };
                let name = type_condition.node.on.node.as_str();
                match ctx.schema.type_definition(name) {
                    None => {
                        let suggestions = suggestion::suggestion_list(name, ctx.schema.types().map(|ty| ty.name()));
                        ctx.push_error(
                            format!("Unknown type '{name}'.{}", suggestion::did_you_mean(&suggestions)),
                            [type_condition.node.on.pos],
                        );
                    }
                    Some(definition) if definition.as_object().is_none() => {
                        ctx.push_error(
                            format!("Fragment cannot condition on non composite type '{name}'."),
                            [type_condition.node.on.pos],
                        );
                    }
                    Some(_) => {
                        if name != parent_type {
                            ctx.push_error(
                                format!(
                                    "Fragment cannot be spread here as objects of type '{parent_type}' can never be of type '{name}'."
                                ),
                                [inline_fragment.pos],
                            );
                        }
                        validate_selection_set(ctx, name, &inline_fragment.node.selection_set);
                    }
                }
            }
        }
    }
}

fn validate_field(ctx: &mut ValidationContext<'_>, parent_type: &str, field: &Positioned<Field>) {
    directives::validate(ctx, &field.node.directives, DirectiveLocation::Field);

    let name = field.node.name.node.as_str();
    let Some(definition) = ctx.schema.field(parent_type, name) else {
        let suggestions = ctx
            .schema
            .object(parent_type)
            .map(|object| suggestion::suggestion_list(name, object.fields.keys().map(String::as_str)))
            .unwrap_or_default();
        ctx.push_error(
            format!(
                "Cannot query field '{name}' on type '{parent_type}'.{}",
                suggestion::did_you_mean(&suggestions)
            ),
            [field.pos],
        );
        return;
    };

    arguments::validate(
        ctx,
        ArgumentOwner::Field { parent_type, name },
        field.pos,
        &field.node.arguments,
        &definition.arguments,
    );

    let ty = &definition.ty;
    let has_selection_set = !field.node.selection_set.node.items.is_empty();
    match ctx.schema.type_definition(ty.named_type()) {
        Some(definition) if definition.is_leaf() => {
            if has_selection_set {
                ctx.push_error(
                    format!("Field '{name}' must not have a selection since type '{ty}' has no subfields."),
                    [field.node.selection_set.pos],
                );
            }
        }
        Some(definition) => {
            if has_selection_set {
                validate_selection_set(ctx, definition.name(), &field.node.selection_set);
            } else {
                ctx.push_error(
                    format!(
                        "Field '{name}' of type '{ty}' must have a selection of subfields. Did you mean '{name} {{ ... }}'?"
                    ),
                    [field.pos],
                );
            }
        }
        None => (),
    }
}
