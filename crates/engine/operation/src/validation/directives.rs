use std::collections::HashMap;

use async_graphql_parser::{
    types::{Directive, OperationDefinition, OperationType},
    Pos, Positioned,
};
use schema::DirectiveLocation;

use super::{
    arguments::{self, ArgumentOwner},
    ValidationContext,
};

pub(super) fn operation_location(operation: &Positioned<OperationDefinition>) -> DirectiveLocation {
    match operation.node.ty {
        OperationType::Query => DirectiveLocation::Query,
        OperationType::Mutation => DirectiveLocation::Mutation,
        OperationType::Subscription => DirectiveLocation::Subscription,
    }
}

/// Known directives, directives in allowed locations, unique directives per location and their
/// arguments.
pub(super) fn validate(
    ctx: &mut ValidationContext<'_>,
    directives: &[Positioned<Directive>],
    location: DirectiveLocation,
) {
    let mut seen = HashMap::<&str, Pos>::new();

    for directive in directives {
        let name = directive.node.name.node.as_str();
        let Some(definition) = ctx.schema.directive(name) else {
            ctx.push_error(format!("Unknown directive '@{name}'."), [directive.pos]);
            continue;
        };

        if !definition.locations.contains(&location) {
            ctx.push_error(
                format!("Directive '@{name}' may not be used on {location}."),
                [directive.pos],
            );
        }

        if !definition.is_repeatable {
            if let Some(first) = seen.insert(name, directive.pos) {
                ctx.push_error(
                    format!("The directive '@{name}' can only be used once at this location."),
                    [first, directive.pos],
                );
            }
        }

        arguments::validate(
            ctx,
            ArgumentOwner::Directive(name),
            directive.pos,
            &directive.node.arguments,
            &definition.arguments,
        );
    }
}
