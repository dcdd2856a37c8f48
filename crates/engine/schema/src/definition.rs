use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::{Permission, Resolver, ScalarKind, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

#[derive(Debug)]
pub enum TypeDefinition {
    Scalar(ScalarDefinition),
    Object(ObjectDefinition),
    Enum(EnumDefinition),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar(def) => &def.name,
            TypeDefinition::Object(def) => &def.name,
            TypeDefinition::Enum(def) => &def.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            TypeDefinition::Scalar(def) => def.description.as_deref(),
            TypeDefinition::Object(def) => def.description.as_deref(),
            TypeDefinition::Enum(def) => def.description.as_deref(),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDefinition::Scalar(_) => TypeKind::Scalar,
            TypeDefinition::Object(_) => TypeKind::Object,
            TypeDefinition::Enum(_) => TypeKind::Enum,
        }
    }

    /// Scalars and enums, the types without subfields.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, TypeDefinition::Object(_))
    }

    pub fn is_input(&self) -> bool {
        self.is_leaf()
    }

    pub fn as_object(&self) -> Option<&ObjectDefinition> {
        match self {
            TypeDefinition::Object(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDefinition> {
        match self {
            TypeDefinition::Enum(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarDefinition> {
        match self {
            TypeDefinition::Scalar(def) => Some(def),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ScalarDefinition {
    pub name: String,
    pub description: Option<String>,
    pub specified_by_url: Option<String>,
    pub kind: ScalarKind,
}

const STRING_DESCRIPTION: &str = "\
    The `String` scalar type represents textual data, represented as UTF-8 character sequences.";
const INT_DESCRIPTION: &str = "\
    The `Int` scalar type represents non-fractional signed whole numeric values. Int can \
    represent values between -(2^31) and 2^31 - 1.";
const FLOAT_DESCRIPTION: &str = "\
    The `Float` scalar type represents signed double-precision fractional values as specified by \
    IEEE 754.";
const ID_DESCRIPTION: &str = "\
    The `ID` scalar type represents a unique identifier, often used to refetch an object or as \
    key for a cache.";

impl ScalarDefinition {
    pub fn builtin(kind: ScalarKind) -> Self {
        let description = match kind {
            ScalarKind::String => STRING_DESCRIPTION,
            ScalarKind::Int => INT_DESCRIPTION,
            ScalarKind::Float => FLOAT_DESCRIPTION,
            ScalarKind::Boolean => "The `Boolean` scalar type represents `true` or `false`.",
            ScalarKind::Id => ID_DESCRIPTION,
            ScalarKind::Upload => "A file part of a multipart request.",
            ScalarKind::Custom => "",
        };
        ScalarDefinition {
            name: kind.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            specified_by_url: None,
            kind,
        }
    }
}

#[derive(Debug)]
pub struct ObjectDefinition {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldDefinition>,
}

impl ObjectDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }
}

pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub arguments: IndexMap<String, InputValueDefinition>,
    pub resolver: Resolver,
    pub permissions: Vec<Arc<dyn Permission>>,
    pub deprecation_reason: Option<String>,
    /// Value used by the default resolver when the parent object lacks the field.
    pub default_value: Option<Value>,
}

impl FieldDefinition {
    pub fn argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.get(name)
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation_reason.is_some()
    }
}

impl std::fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("ty", &self.ty.to_string())
            .field("arguments", &self.arguments)
            .field("resolver", &self.resolver)
            .field("permissions", &self.permissions.len())
            .field("deprecation_reason", &self.deprecation_reason)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug)]
pub struct EnumDefinition {
    pub name: String,
    pub description: Option<String>,
    pub values: IndexMap<String, EnumValueDefinition>,
}

impl EnumDefinition {
    pub fn value(&self, name: &str) -> Option<&EnumValueDefinition> {
        self.values.get(name)
    }

    /// Resolved values must name one of the enum values.
    pub fn coerce_output(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(name) if self.values.contains_key(name) => Ok(value.clone()),
            _ => Err(format!("Enum '{}' cannot represent value: {}", self.name, value)),
        }
    }

    pub fn coerce_input(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(name) if self.values.contains_key(name) => Ok(value.clone()),
            Value::String(name) => Err(format!("Value '{name}' does not exist in '{}' enum.", self.name)),
            _ => Err(format!("Enum '{}' cannot represent non-string value: {}", self.name, value)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: IndexMap<String, InputValueDefinition>,
    pub is_repeatable: bool,
}

impl DirectiveDefinition {
    pub(crate) fn builtins() -> Vec<DirectiveDefinition> {
        let condition = |name: &str, description: &str, if_description: &str| DirectiveDefinition {
            name: name.to_string(),
            description: Some(description.to_string()),
            locations: vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            arguments: IndexMap::from([(
                "if".to_string(),
                InputValueDefinition {
                    name: "if".to_string(),
                    description: Some(if_description.to_string()),
                    ty: TypeRef::named_non_null("Boolean"),
                    default_value: None,
                    deprecation_reason: None,
                },
            )]),
            is_repeatable: false,
        };

        vec![
            condition(
                "include",
                "Directs the executor to include this field or fragment only when the `if` argument is true.",
                "Included when true.",
            ),
            condition(
                "skip",
                "Directs the executor to skip this field or fragment when the `if` argument is true.",
                "Skipped when true.",
            ),
            DirectiveDefinition {
                name: "deprecated".to_string(),
                description: Some("Marks an element of a GraphQL schema as no longer supported.".to_string()),
                locations: vec![
                    DirectiveLocation::FieldDefinition,
                    DirectiveLocation::ArgumentDefinition,
                    DirectiveLocation::InputFieldDefinition,
                    DirectiveLocation::EnumValue,
                ],
                arguments: IndexMap::from([(
                    "reason".to_string(),
                    InputValueDefinition {
                        name: "reason".to_string(),
                        description: Some("Explains why this element was deprecated.".to_string()),
                        ty: TypeRef::named("String"),
                        default_value: Some(Value::String("No longer supported".to_string())),
                        deprecation_reason: None,
                    },
                )]),
                is_repeatable: false,
            },
        ]
    }
}
