//! The introspection types and the `__typename`, `__schema` and `__type` meta fields.
//!
//! Introspection objects are plain JSON values resolved with the default resolver, except for
//! `__Type` which is represented as `{"__ref": "<type reference>"}` and resolved lazily since
//! types reference each other.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::{
    builder::{Enum, Field, InputValue, Object},
    DirectiveDefinition, FieldDefinition, FieldResult, InputValueDefinition, Resolver, ResolverContext, Schema,
    TypeDefinition, TypeKind, TypeRef,
};

const TYPE_REF_KEY: &str = "__ref";

const SCHEMA_DESCRIPTION: &str = "\
    A GraphQL Schema defines the capabilities of a GraphQL server. It exposes all available \
    types and directives on the server, as well as the entry points for query, mutation, and \
    subscription operations.";
const MUTATION_TYPE_DESCRIPTION: &str = "\
    If this server supports mutation, the type that mutation operations will be rooted at.";
const SUBSCRIPTION_TYPE_DESCRIPTION: &str = "\
    If this server support subscription, the type that subscription operations will be rooted \
    at.";
const DIRECTIVES_DESCRIPTION: &str = "A list of all directives supported by this server.";
const TYPE_DESCRIPTION: &str = "\
    The fundamental unit of any GraphQL Schema is the type. There are many kinds of types in \
    GraphQL as represented by the `__TypeKind` enum.";
const FIELD_DESCRIPTION: &str = "\
    Object and Interface types are described by a list of Fields, each of which has a name, \
    potentially a list of arguments, and a return type.";
const INPUT_VALUE_DESCRIPTION: &str = "\
    Arguments provided to Fields or Directives and the input fields of an InputObject are \
    represented as Input Values which describe their type and optionally a default value.";
const DEFAULT_VALUE_DESCRIPTION: &str = "\
    A GraphQL-formatted string representing the default value for this input value.";
const ENUM_VALUE_DESCRIPTION: &str = "\
    One possible value for a given Enum. Enum values are unique values, not a placeholder for a \
    string or numeric value. However an Enum value is returned in a JSON response as a string.";
const DIRECTIVE_DESCRIPTION: &str = "\
    A Directive provides a way to describe alternate runtime execution and type validation \
    behavior in a GraphQL document.";
const DIRECTIVE_LOCATION_DESCRIPTION: &str = "\
    A Directive can be adjacent to many parts of the GraphQL language, a __DirectiveLocation \
    describes one such possible adjacencies.";

pub(crate) struct MetaFields {
    pub typename: FieldDefinition,
    pub schema: FieldDefinition,
    pub type_: FieldDefinition,
}

pub(crate) fn meta_fields() -> MetaFields {
    let field = |name: &str, ty: TypeRef, resolver: Resolver| FieldDefinition {
        name: name.to_string(),
        description: None,
        ty,
        arguments: IndexMap::new(),
        resolver,
        permissions: Vec::new(),
        deprecation_reason: None,
        default_value: None,
    };

    let mut type_ = field(
        "__type",
        TypeRef::named("__Type"),
        Resolver::sync(|ctx| {
            let name = ctx.argument::<String>("name")?.unwrap_or_default();
            Ok(match ctx.schema().type_definition(&name) {
                Some(_) => type_ref_value(&TypeRef::Named(name)),
                None => Value::Null,
            })
        }),
    );
    type_.arguments.insert(
        "name".to_string(),
        InputValueDefinition {
            name: "name".to_string(),
            description: None,
            ty: TypeRef::named_non_null("String"),
            default_value: None,
            deprecation_reason: None,
        },
    );

    MetaFields {
        typename: field(
            "__typename",
            TypeRef::named_non_null("String"),
            Resolver::sync(|ctx| Ok(Value::String(ctx.parent_type().to_string()))),
        ),
        schema: field(
            "__schema",
            TypeRef::named_non_null("__Schema"),
            Resolver::sync(|ctx| Ok(schema_value(ctx.schema()))),
        ),
        type_,
    }
}

pub(crate) fn objects() -> Vec<Object> {
    let include_deprecated = || InputValue::new("includeDeprecated", "Boolean").default_value(false);

    vec![
        Object::new("__Schema")
            .description(SCHEMA_DESCRIPTION)
            .field(Field::new("description", "String"))
            .field(Field::new("types", "[__Type!]!").description("A list of all types supported by this server."))
            .field(Field::new("queryType", "__Type!").description("The type that query operations will be rooted at."))
            .field(Field::new("mutationType", "__Type").description(MUTATION_TYPE_DESCRIPTION))
            .field(Field::new("subscriptionType", "__Type").description(SUBSCRIPTION_TYPE_DESCRIPTION))
            .field(Field::new("directives", "[__Directive!]!").description(DIRECTIVES_DESCRIPTION)),
        Object::new("__Type")
            .description(TYPE_DESCRIPTION)
            .field(Field::new("kind", "__TypeKind!").resolve_sync(type_kind))
            .field(Field::new("name", "String").resolve_sync(type_name))
            .field(Field::new("description", "String").resolve_sync(type_description))
            .field(Field::new("specifiedByURL", "String").resolve_sync(type_specified_by_url))
            .field(
                Field::new("fields", "[__Field!]")
                    .argument(include_deprecated())
                    .resolve_sync(type_fields),
            )
            .field(Field::new("interfaces", "[__Type!]").resolve_sync(type_interfaces))
            .field(Field::new("possibleTypes", "[__Type!]").resolve_sync(|_| Ok(Value::Null)))
            .field(
                Field::new("enumValues", "[__EnumValue!]")
                    .argument(include_deprecated())
                    .resolve_sync(type_enum_values),
            )
            .field(
                Field::new("inputFields", "[__InputValue!]")
                    .argument(include_deprecated())
                    .resolve_sync(|_| Ok(Value::Null)),
            )
            .field(Field::new("ofType", "__Type").resolve_sync(type_of_type))
            .field(Field::new("isOneOf", "Boolean").resolve_sync(|_| Ok(Value::Null))),
        Object::new("__Field")
            .description(FIELD_DESCRIPTION)
            .field(Field::new("name", "String!"))
            .field(Field::new("description", "String"))
            .field(
                Field::new("args", "[__InputValue!]!")
                    .argument(include_deprecated())
                    .resolve_sync(args),
            )
            .field(Field::new("type", "__Type!"))
            .field(Field::new("isDeprecated", "Boolean!"))
            .field(Field::new("deprecationReason", "String")),
        Object::new("__InputValue")
            .description(INPUT_VALUE_DESCRIPTION)
            .field(Field::new("name", "String!"))
            .field(Field::new("description", "String"))
            .field(Field::new("type", "__Type!"))
            .field(Field::new("defaultValue", "String").description(DEFAULT_VALUE_DESCRIPTION))
            .field(Field::new("isDeprecated", "Boolean!"))
            .field(Field::new("deprecationReason", "String")),
        Object::new("__EnumValue")
            .description(ENUM_VALUE_DESCRIPTION)
            .field(Field::new("name", "String!"))
            .field(Field::new("description", "String"))
            .field(Field::new("isDeprecated", "Boolean!"))
            .field(Field::new("deprecationReason", "String")),
        Object::new("__Directive")
            .description(DIRECTIVE_DESCRIPTION)
            .field(Field::new("name", "String!"))
            .field(Field::new("description", "String"))
            .field(Field::new("isRepeatable", "Boolean!"))
            .field(Field::new("locations", "[__DirectiveLocation!]!"))
            .field(
                Field::new("args", "[__InputValue!]!")
                    .argument(include_deprecated())
                    .resolve_sync(args),
            ),
    ]
}

pub(crate) fn enums() -> Vec<Enum> {
    vec![
        Enum::new("__TypeKind")
            .description("An enum describing what kind of type a given `__Type` is.")
            .values([
                "SCALAR",
                "OBJECT",
                "INTERFACE",
                "UNION",
                "ENUM",
                "INPUT_OBJECT",
                "LIST",
                "NON_NULL",
            ]),
        Enum::new("__DirectiveLocation")
            .description(DIRECTIVE_LOCATION_DESCRIPTION)
            .values([
                "QUERY",
                "MUTATION",
                "SUBSCRIPTION",
                "FIELD",
                "FRAGMENT_DEFINITION",
                "FRAGMENT_SPREAD",
                "INLINE_FRAGMENT",
                "VARIABLE_DEFINITION",
                "SCHEMA",
                "SCALAR",
                "OBJECT",
                "FIELD_DEFINITION",
                "ARGUMENT_DEFINITION",
                "INTERFACE",
                "UNION",
                "ENUM",
                "ENUM_VALUE",
                "INPUT_OBJECT",
                "INPUT_FIELD_DEFINITION",
            ]),
    ]
}

fn type_ref_value(ty: &TypeRef) -> Value {
    json!({ TYPE_REF_KEY: ty.to_string() })
}

fn schema_value(schema: &Schema) -> Value {
    json!({
        "description": null,
        "types": schema
            .types()
            .map(|definition| type_ref_value(&TypeRef::named(definition.name())))
            .collect::<Vec<_>>(),
        "queryType": type_ref_value(&TypeRef::named(schema.query_type())),
        "mutationType": schema.mutation_type().map(|name| type_ref_value(&TypeRef::named(name))),
        "subscriptionType": null,
        "directives": schema
            .directives()
            .map(|directive| directive_value(schema, directive))
            .collect::<Vec<_>>(),
    })
}

fn field_value(schema: &Schema, field: &FieldDefinition) -> Value {
    json!({
        "name": field.name,
        "description": field.description,
        "args": field
            .arguments
            .values()
            .map(|argument| input_value_value(schema, argument))
            .collect::<Vec<_>>(),
        "type": type_ref_value(&field.ty),
        "isDeprecated": field.is_deprecated(),
        "deprecationReason": field.deprecation_reason,
    })
}

fn input_value_value(schema: &Schema, input_value: &InputValueDefinition) -> Value {
    json!({
        "name": input_value.name,
        "description": input_value.description,
        "type": type_ref_value(&input_value.ty),
        "defaultValue": input_value
            .default_value
            .as_ref()
            .map(|value| print_value(schema, &input_value.ty, value)),
        "isDeprecated": input_value.deprecation_reason.is_some(),
        "deprecationReason": input_value.deprecation_reason,
    })
}

fn directive_value(schema: &Schema, directive: &DirectiveDefinition) -> Value {
    json!({
        "name": directive.name,
        "description": directive.description,
        "isRepeatable": directive.is_repeatable,
        "locations": directive
            .locations
            .iter()
            .map(|location| location.as_ref())
            .collect::<Vec<_>>(),
        "args": directive
            .arguments
            .values()
            .map(|argument| input_value_value(schema, argument))
            .collect::<Vec<_>>(),
    })
}

/// Renders a JSON value as a GraphQL literal of type `ty`, enum values unquoted.
pub(crate) fn print_value(schema: &Schema, ty: &TypeRef, value: &Value) -> String {
    match value {
        Value::String(s) if schema.type_definition(ty.named_type()).and_then(TypeDefinition::as_enum).is_some() => {
            s.clone()
        }
        Value::Array(items) => {
            let items: Vec<_> = items.iter().map(|item| print_value(schema, ty, item)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(fields) => {
            let fields: Vec<_> = fields
                .iter()
                .map(|(key, value)| format!("{key}: {}", print_value(schema, ty, value)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        other => other.to_string(),
    }
}

fn parent_type_ref(ctx: &ResolverContext) -> FieldResult<TypeRef> {
    let reference = ctx
        .parent()
        .get(TYPE_REF_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(reference.parse()?)
}

fn parent_definition(ctx: &ResolverContext) -> FieldResult<Option<&TypeDefinition>> {
    Ok(match parent_type_ref(ctx)? {
        TypeRef::Named(name) => ctx.schema().type_definition(&name),
        _ => None,
    })
}

fn type_kind(ctx: &ResolverContext) -> FieldResult<Value> {
    let kind = match parent_type_ref(ctx)? {
        TypeRef::NonNull(_) => TypeKind::NonNull,
        TypeRef::List(_) => TypeKind::List,
        TypeRef::Named(name) => ctx
            .schema()
            .type_definition(&name)
            .map(TypeDefinition::kind)
            .ok_or_else(|| format!("Unknown type '{name}'"))?,
    };
    Ok(Value::String(kind.to_string()))
}

fn type_name(ctx: &ResolverContext) -> FieldResult<Value> {
    Ok(match parent_type_ref(ctx)? {
        TypeRef::Named(name) => Value::String(name),
        _ => Value::Null,
    })
}

fn type_description(ctx: &ResolverContext) -> FieldResult<Value> {
    Ok(parent_definition(ctx)?
        .and_then(TypeDefinition::description)
        .map(Value::from)
        .unwrap_or_default())
}

fn type_specified_by_url(ctx: &ResolverContext) -> FieldResult<Value> {
    Ok(parent_definition(ctx)?
        .and_then(TypeDefinition::as_scalar)
        .and_then(|scalar| scalar.specified_by_url.clone())
        .map(Value::String)
        .unwrap_or_default())
}

fn include_deprecated(ctx: &ResolverContext) -> FieldResult<bool> {
    Ok(ctx.argument::<bool>("includeDeprecated")?.unwrap_or_default())
}

fn type_fields(ctx: &ResolverContext) -> FieldResult<Value> {
    let include_deprecated = include_deprecated(ctx)?;
    let Some(object) = parent_definition(ctx)?.and_then(TypeDefinition::as_object) else {
        return Ok(Value::Null);
    };
    Ok(object
        .fields
        .values()
        .filter(|field| include_deprecated || !field.is_deprecated())
        .map(|field| field_value(ctx.schema(), field))
        .collect())
}

fn type_interfaces(ctx: &ResolverContext) -> FieldResult<Value> {
    Ok(match parent_definition(ctx)? {
        Some(TypeDefinition::Object(_)) => Value::Array(Vec::new()),
        _ => Value::Null,
    })
}

fn type_enum_values(ctx: &ResolverContext) -> FieldResult<Value> {
    let include_deprecated = include_deprecated(ctx)?;
    let Some(definition) = parent_definition(ctx)?.and_then(TypeDefinition::as_enum) else {
        return Ok(Value::Null);
    };
    Ok(definition
        .values
        .values()
        .filter(|value| include_deprecated || value.deprecation_reason.is_none())
        .map(|value| {
            json!({
                "name": value.name,
                "description": value.description,
                "isDeprecated": value.deprecation_reason.is_some(),
                "deprecationReason": value.deprecation_reason,
            })
        })
        .collect())
}

fn type_of_type(ctx: &ResolverContext) -> FieldResult<Value> {
    Ok(match parent_type_ref(ctx)? {
        TypeRef::List(inner) | TypeRef::NonNull(inner) => type_ref_value(&inner),
        TypeRef::Named(_) => Value::Null,
    })
}

/// `args` of `__Field` and `__Directive`, computed eagerly with the parent.
fn args(ctx: &ResolverContext) -> FieldResult<Value> {
    let include_deprecated = include_deprecated(ctx)?;
    let args = ctx.parent().get("args").and_then(Value::as_array).cloned().unwrap_or_default();
    Ok(args
        .into_iter()
        .filter(|arg| include_deprecated || arg.get("isDeprecated") != Some(&Value::Bool(true)))
        .collect())
}
