use std::collections::HashSet;

use async_graphql_parser::{
    types::{ExecutableDocument, Field, Selection, SelectionSet},
    Pos, Positioned,
};
use indexmap::IndexMap;
use itertools::Itertools;
use schema::{FieldDefinition, Schema, TypeRef};

use super::ValidationContext;

#[derive(Clone, Copy)]
struct FieldInfo<'s> {
    parent_type: &'s str,
    field: &'s Positioned<Field>,
    definition: Option<&'s FieldDefinition>,
}

enum Reason {
    Message(String),
    Subfields(Vec<(String, Reason)>),
}

impl Reason {
    fn describe(&self) -> String {
        match self {
            Reason::Message(message) => message.clone(),
            Reason::Subfields(conflicts) => conflicts
                .iter()
                .map(|(key, reason)| format!("subfields '{key}' conflict because {}", reason.describe()))
                .join(" and "),
        }
    }
}

/// Fields sharing a response key must be mergeable: same field, same arguments and compatible
/// shapes.
pub(super) fn validate(ctx: &mut ValidationContext<'_>, parent_type: &str, selection_set: &Positioned<SelectionSet>) {
    let (schema, document) = (ctx.schema, ctx.document);
    let mut entered = HashSet::new();
    let fields = collect(schema, document, parent_type, selection_set, &mut entered);

    let mut conflicts = Vec::new();
    for (key, fields) in &fields {
        for (i, a) in fields.iter().enumerate() {
            for b in &fields[i + 1..] {
                if let Some((reason, positions)) = find_conflict(schema, document, (a, &entered), (b, &entered)) {
                    conflicts.push((*key, a.field.pos, b.field.pos, reason, positions));
                }
            }
        }
    }

    for (key, a, b, reason, positions) in conflicts {
        let pair = if (a.line, a.column) <= (b.line, b.column) {
            (a, b)
        } else {
            (b, a)
        };
        if ctx.reported_conflicts.insert(pair) {
            ctx.push_error(
                format!(
                    "Fields '{key}' conflict because {}. Use different aliases on the fields to fetch both if this was intentional.",
                    reason.describe()
                ),
                positions,
            );
        }
    }
}

/// Fields of a selection set by response key, fragments flattened. Fragments already in
/// `entered` are skipped, which keeps cyclic fragments from looping.
fn collect<'s>(
    schema: &'s Schema,
    document: &'s ExecutableDocument,
    parent_type: &'s str,
    selection_set: &'s Positioned<SelectionSet>,
    entered: &mut HashSet<&'s str>,
) -> IndexMap<&'s str, Vec<FieldInfo<'s>>> {
    let mut fields = IndexMap::new();
    collect_into(schema, document, parent_type, selection_set, entered, &mut fields);
    fields
}

fn collect_into<'s>(
    schema: &'s Schema,
    document: &'s ExecutableDocument,
    parent_type: &'s str,
    selection_set: &'s Positioned<SelectionSet>,
    entered: &mut HashSet<&'s str>,
    fields: &mut IndexMap<&'s str, Vec<FieldInfo<'s>>>,
) {
    for item in &selection_set.node.items {
        match &item.node {
            Selection::Field(field) => {
                let key = field.node.alias.as_ref().unwrap_or(&field.node.name).node.as_str();
                fields.entry(key).or_default().push(FieldInfo {
                    parent_type,
                    field,
                    definition: schema.field(parent_type, field.node.name.node.as_str()),
                });
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                let Some(fragment) = document.fragments.get(name) else {
                    continue;
                };
                if !entered.insert(name) {
                    continue;
                }
                let type_condition = fragment.node.type_condition.node.on.node.as_str();
                collect_into(
                    schema,
                    document,
                    type_condition,
                    &fragment.node.selection_set,
                    entered,
                    fields,
                );
            }
            Selection::InlineFragment(inline_fragment) => {
                let parent_type = inline_fragment
                    .node
                    .type_condition
                    .as_ref()
                    .map(|condition| condition.node.on.node.as_str())
                    .unwrap_or(parent_type);
                collect_into(
                    schema,
                    document,
                    parent_type,
                    &inline_fragment.node.selection_set,
                    entered,
                    fields,
                );
            }
        }
    }
}

fn find_conflict<'s>(
    schema: &'s Schema,
    document: &'s ExecutableDocument,
    (a, a_entered): (&FieldInfo<'s>, &HashSet<&'s str>),
    (b, b_entered): (&FieldInfo<'s>, &HashSet<&'s str>),
) -> Option<(Reason, Vec<Pos>)> {
    let positions = vec![a.field.pos, b.field.pos];

    // Different object types never apply to the same value, only their shapes must agree.
    if a.parent_type == b.parent_type {
        let (a_name, b_name) = (&a.field.node.name.node, &b.field.node.name.node);
        if a_name != b_name {
            return Some((
                Reason::Message(format!("'{a_name}' and '{b_name}' are different fields")),
                positions,
            ));
        }
        if !same_arguments(&a.field.node, &b.field.node) {
            return Some((Reason::Message("they have differing arguments".to_string()), positions));
        }
    }

    if let (Some(a_definition), Some(b_definition)) = (a.definition, b.definition) {
        if types_conflict(schema, &a_definition.ty, &b_definition.ty) {
            return Some((
                Reason::Message(format!(
                    "they return conflicting types '{}' and '{}'",
                    a_definition.ty, b_definition.ty
                )),
                positions,
            ));
        }
    }

    let (Some(a_definition), Some(b_definition)) = (a.definition, b.definition) else {
        return None;
    };
    if a.field.node.selection_set.node.items.is_empty() || b.field.node.selection_set.node.items.is_empty() {
        return None;
    }

    let mut a_entered = a_entered.clone();
    let a_fields = collect(
        schema,
        document,
        a_definition.ty.named_type(),
        &a.field.node.selection_set,
        &mut a_entered,
    );
    let mut b_entered = b_entered.clone();
    let b_fields = collect(
        schema,
        document,
        b_definition.ty.named_type(),
        &b.field.node.selection_set,
        &mut b_entered,
    );

    let mut reasons = Vec::new();
    let mut sub_positions = Vec::new();
    for (key, a_subfields) in &a_fields {
        let Some(b_subfields) = b_fields.get(key) else {
            continue;
        };
        for a_subfield in a_subfields {
            for b_subfield in b_subfields {
                if let Some((reason, positions)) =
                    find_conflict(schema, document, (a_subfield, &a_entered), (b_subfield, &b_entered))
                {
                    reasons.push((key.to_string(), reason));
                    sub_positions.extend(positions);
                }
            }
        }
    }

    if reasons.is_empty() {
        return None;
    }
    let mut positions = positions;
    positions.extend(sub_positions);
    Some((Reason::Subfields(reasons), positions))
}

fn same_arguments(a: &Field, b: &Field) -> bool {
    a.arguments.len() == b.arguments.len()
        && a.arguments.iter().all(|(name, value)| {
            b.arguments
                .iter()
                .any(|(other_name, other_value)| name.node == other_name.node && value.node == other_value.node)
        })
}

fn types_conflict(schema: &Schema, a: &TypeRef, b: &TypeRef) -> bool {
    match (a, b) {
        (TypeRef::List(a), TypeRef::List(b)) | (TypeRef::NonNull(a), TypeRef::NonNull(b)) => {
            types_conflict(schema, a, b)
        }
        (TypeRef::List(_), _) | (_, TypeRef::List(_)) | (TypeRef::NonNull(_), _) | (_, TypeRef::NonNull(_)) => true,
        (TypeRef::Named(a), TypeRef::Named(b)) => {
            let is_leaf = |name: &str| schema.type_definition(name).is_some_and(|ty| ty.is_leaf());
            (is_leaf(a) || is_leaf(b)) && a != b
        }
    }
}
