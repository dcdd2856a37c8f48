use std::collections::{HashMap, HashSet};

use async_graphql_parser::{
    types::{FragmentSpread, Selection, SelectionSet},
    Positioned,
};
use itertools::Itertools;
use schema::DirectiveLocation;

use super::{directives, suggestion, ValidationContext};

/// Type conditions of fragment definitions, unused fragments and fragment cycles.
pub(super) fn validate_definitions(ctx: &mut ValidationContext<'_>) {
    let fragments = ctx.fragments();

    for (name, fragment) in &fragments {
        directives::validate(ctx, &fragment.node.directives, DirectiveLocation::FragmentDefinition);

        let type_condition = &fragment.node.type_condition.node.on;
        match ctx.schema.type_definition(type_condition.node.as_str()) {
            None => {
                let suggestions =
                    suggestion::suggestion_list(type_condition.node.as_str(), ctx.schema.types().map(|ty| ty.name()));
                ctx.push_error(
                    format!(
                        "Unknown type '{}'.{}",
                        type_condition.node,
                        suggestion::did_you_mean(&suggestions)
                    ),
                    [type_condition.pos],
                );
            }
            Some(definition) if definition.as_object().is_none() => ctx.push_error(
                format!(
                    "Fragment '{name}' cannot condition on non composite type '{}'.",
                    type_condition.node
                ),
                [type_condition.pos],
            ),
            Some(_) => (),
        }
    }

    let mut used = HashSet::new();
    let mut stack: Vec<&str> = ctx
        .document
        .operations
        .iter()
        .flat_map(|(_, operation)| direct_spreads(&operation.node.selection_set))
        .map(|spread| spread.node.fragment_name.node.as_str())
        .collect();
    while let Some(name) = stack.pop() {
        if !used.insert(name) {
            continue;
        }
        if let Some(fragment) = ctx.document.fragments.get(name) {
            stack.extend(
                direct_spreads(&fragment.node.selection_set)
                    .into_iter()
                    .map(|spread| spread.node.fragment_name.node.as_str()),
            );
        }
    }
    for (name, fragment) in &fragments {
        if !used.contains(name) {
            ctx.push_error(format!("Fragment '{name}' is never used."), [fragment.pos]);
        }
    }

    let mut detector = CycleDetector {
        visited: HashSet::new(),
        spread_path: Vec::new(),
        spread_path_index_by_name: HashMap::new(),
    };
    for (name, _) in &fragments {
        detector.detect(ctx, name);
    }
}

/// Spreads of a selection set and its nested selection sets, without entering fragments.
pub(super) fn direct_spreads(selection_set: &Positioned<SelectionSet>) -> Vec<&Positioned<FragmentSpread>> {
    let mut spreads = Vec::new();
    let mut stack = vec![selection_set];
    while let Some(selection_set) = stack.pop() {
        for item in &selection_set.node.items {
            match &item.node {
                Selection::Field(field) => stack.push(&field.node.selection_set),
                Selection::FragmentSpread(spread) => spreads.push(spread),
                Selection::InlineFragment(inline_fragment) => stack.push(&inline_fragment.node.selection_set),
            }
        }
    }
    spreads.sort_by_key(|spread| (spread.pos.line, spread.pos.column));
    spreads
}

struct CycleDetector<'a> {
    visited: HashSet<&'a str>,
    spread_path: Vec<&'a Positioned<FragmentSpread>>,
    spread_path_index_by_name: HashMap<&'a str, usize>,
}

impl<'a> CycleDetector<'a> {
    fn detect(&mut self, ctx: &mut ValidationContext<'a>, name: &'a str) {
        if !self.visited.insert(name) {
            return;
        }
        let Some(fragment) = ctx.document.fragments.get(name) else {
            return;
        };
        let spreads = direct_spreads(&fragment.node.selection_set);
        if spreads.is_empty() {
            return;
        }

        self.spread_path_index_by_name.insert(name, self.spread_path.len());
        for spread in spreads {
            let spread_name = spread.node.fragment_name.node.as_str();
            self.spread_path.push(spread);
            match self.spread_path_index_by_name.get(spread_name) {
                None => self.detect(ctx, spread_name),
                Some(&cycle_index) => {
                    let cycle = &self.spread_path[cycle_index..];
                    let via = cycle[..cycle.len() - 1]
                        .iter()
                        .map(|spread| format!("'{}'", spread.node.fragment_name.node))
                        .join(", ");
                    let message = if via.is_empty() {
                        format!("Cannot spread fragment '{spread_name}' within itself.")
                    } else {
                        format!("Cannot spread fragment '{spread_name}' within itself via {via}.")
                    };
                    ctx.push_error(message, cycle.iter().map(|spread| spread.pos));
                }
            }
            self.spread_path.pop();
        }
        self.spread_path_index_by_name.remove(name);
    }
}
