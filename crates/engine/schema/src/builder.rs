use std::{future::Future, sync::Arc};

use indexmap::{map::Entry, IndexMap};
use serde_json::Value;

use crate::{
    introspection, DirectiveDefinition, EnumDefinition, EnumValueDefinition, FieldDefinition, FieldResult,
    InputValueDefinition, InputValueError, ObjectDefinition, OperationLimits, Permission, Resolver,
    ResolverContext, ScalarDefinition, ScalarKind, Schema, TypeDefinition, TypeRef,
};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),
    #[error("Names starting with '__' are reserved for introspection: '{0}'")]
    ReservedName(String),
    #[error("Field '{field}' is defined more than once on type '{ty}'")]
    DuplicateField { ty: String, field: String },
    #[error("Argument '{argument}' is defined more than once on field '{location}'")]
    DuplicateArgument { location: String, argument: String },
    #[error("Invalid type reference '{ty}' on '{location}'")]
    InvalidTypeRef { location: String, ty: String },
    #[error("Unknown type '{ty}' referenced by '{location}'")]
    UnknownType { location: String, ty: String },
    #[error("'{location}' must have an output type, but '{ty}' is not one")]
    NotOutputType { location: String, ty: String },
    #[error("'{location}' must have an input type, but '{ty}' is an object type")]
    NotInputType { location: String, ty: String },
    #[error("Object '{0}' must define at least one field")]
    EmptyObject(String),
    #[error("Enum '{0}' must define at least one value")]
    EmptyEnum(String),
    #[error("Invalid default value of '{location}': {err}")]
    InvalidDefaultValue { location: String, err: InputValueError },
}

/// An object type under construction.
#[derive(Debug)]
pub struct Object {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) fields: Vec<Field>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Object {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A field under construction. The type is written in SDL syntax, `[String!]!` for example, and
/// parsed when the schema is finished.
#[derive(Debug)]
pub struct Field {
    name: String,
    description: Option<String>,
    ty: String,
    arguments: Vec<InputValue>,
    resolver: Resolver,
    permissions: Vec<Arc<dyn Permission>>,
    deprecation_reason: Option<String>,
    default_value: Option<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            description: None,
            ty: ty.into(),
            arguments: Vec::new(),
            resolver: Resolver::Default,
            permissions: Vec::new(),
            deprecation_reason: None,
            default_value: None,
        }
    }

    #[must_use]
    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn resolve_sync<F>(self, resolver: F) -> Self
    where
        F: Fn(&ResolverContext) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.resolver(Resolver::sync(resolver))
    }

    #[must_use]
    pub fn resolve_async<F, Fut>(self, resolver: F) -> Self
    where
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult<Value>> + Send + 'static,
    {
        self.resolver(Resolver::from_async(resolver))
    }

    #[must_use]
    pub fn argument(mut self, argument: InputValue) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Permissions are checked in the order they were added.
    #[must_use]
    pub fn permission(mut self, permission: impl Permission + 'static) -> Self {
        self.permissions.push(Arc::new(permission));
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A field argument under construction.
#[derive(Debug, Clone)]
pub struct InputValue {
    name: String,
    description: Option<String>,
    ty: String,
    default_value: Option<Value>,
    deprecation_reason: Option<String>,
}

impl InputValue {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        InputValue {
            name: name.into(),
            description: None,
            ty: ty.into(),
            default_value: None,
            deprecation_reason: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

#[derive(Debug)]
pub struct Enum {
    name: String,
    description: Option<String>,
    values: Vec<EnumValue>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Enum {
            name: name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<EnumValue>) -> Self {
        self.values.push(value.into());
        self
    }

    #[must_use]
    pub fn values<V: Into<EnumValue>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    name: String,
    description: Option<String>,
    deprecation_reason: Option<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        EnumValue {
            name: name.into(),
            description: None,
            deprecation_reason: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

impl From<&str> for EnumValue {
    fn from(name: &str) -> Self {
        EnumValue::new(name)
    }
}

/// A custom scalar, its values are passed through as they are.
#[derive(Debug)]
pub struct Scalar {
    name: String,
    description: Option<String>,
    specified_by_url: Option<String>,
}

impl Scalar {
    pub fn new(name: impl Into<String>) -> Self {
        Scalar {
            name: name.into(),
            description: None,
            specified_by_url: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn specified_by_url(mut self, url: impl Into<String>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }
}

pub struct SchemaBuilder {
    query: String,
    mutation: Option<String>,
    objects: Vec<Object>,
    enums: Vec<Enum>,
    scalars: Vec<Scalar>,
    auto_camel_case: bool,
    operation_limits: OperationLimits,
    introspection: bool,
}

impl Schema {
    pub fn build(query: Object) -> SchemaBuilder {
        SchemaBuilder {
            query: query.name.clone(),
            mutation: None,
            objects: vec![query],
            enums: Vec::new(),
            scalars: Vec::new(),
            auto_camel_case: true,
            operation_limits: OperationLimits::default(),
            introspection: true,
        }
    }
}

impl SchemaBuilder {
    #[must_use]
    pub fn mutation(mut self, mutation: Object) -> Self {
        self.mutation = Some(mutation.name.clone());
        self.objects.push(mutation);
        self
    }

    #[must_use]
    pub fn register_object(mut self, object: Object) -> Self {
        self.objects.push(object);
        self
    }

    #[must_use]
    pub fn register_enum(mut self, enum_type: Enum) -> Self {
        self.enums.push(enum_type);
        self
    }

    #[must_use]
    pub fn register_scalar(mut self, scalar: Scalar) -> Self {
        self.scalars.push(scalar);
        self
    }

    /// Field and argument names written in snake_case are exposed in camelCase. Enabled by default.
    #[must_use]
    pub fn auto_camel_case(mut self, enabled: bool) -> Self {
        self.auto_camel_case = enabled;
        self
    }

    #[must_use]
    pub fn operation_limits(mut self, limits: OperationLimits) -> Self {
        self.operation_limits = limits;
        self
    }

    #[must_use]
    pub fn disable_introspection(mut self) -> Self {
        self.introspection = false;
        self
    }

    pub fn finish(self) -> Result<Schema, SchemaError> {
        let SchemaBuilder {
            query,
            mutation,
            objects,
            enums,
            scalars,
            auto_camel_case,
            operation_limits,
            introspection,
        } = self;

        let mut types = IndexMap::<String, TypeDefinition>::new();
        let mut insert = |definition: TypeDefinition, reserved_allowed: bool| -> Result<(), SchemaError> {
            let name = definition.name().to_string();
            if !reserved_allowed && name.starts_with("__") {
                return Err(SchemaError::ReservedName(name));
            }
            match types.entry(name) {
                Entry::Occupied(entry) => Err(SchemaError::DuplicateType(entry.key().clone())),
                Entry::Vacant(entry) => {
                    entry.insert(definition);
                    Ok(())
                }
            }
        };

        for object in objects {
            insert(TypeDefinition::Object(build_object(object, auto_camel_case)?), false)?;
        }
        for enum_type in enums {
            insert(TypeDefinition::Enum(build_enum(enum_type)?), false)?;
        }
        for scalar in scalars {
            insert(
                TypeDefinition::Scalar(ScalarDefinition {
                    name: scalar.name,
                    description: scalar.description,
                    specified_by_url: scalar.specified_by_url,
                    kind: ScalarKind::Custom,
                }),
                false,
            )?;
        }
        for kind in ScalarKind::BUILTINS {
            insert(TypeDefinition::Scalar(ScalarDefinition::builtin(kind)), false)?;
        }
        for object in introspection::objects() {
            insert(TypeDefinition::Object(build_object(object, false)?), true)?;
        }
        for enum_type in introspection::enums() {
            insert(TypeDefinition::Enum(build_enum(enum_type)?), true)?;
        }

        let uses_upload = types
            .values()
            .filter_map(TypeDefinition::as_object)
            .flat_map(|object| object.fields.values())
            .flat_map(|field| field.arguments.values())
            .any(|argument| argument.ty.named_type() == "Upload");
        if uses_upload && !types.contains_key("Upload") {
            types.insert(
                "Upload".to_string(),
                TypeDefinition::Scalar(ScalarDefinition::builtin(ScalarKind::Upload)),
            );
        }

        let schema = Schema {
            query_type: query,
            mutation_type: mutation,
            types,
            directives: DirectiveDefinition::builtins()
                .into_iter()
                .map(|directive| (directive.name.clone(), directive))
                .collect(),
            operation_limits,
            introspection,
            meta_fields: introspection::meta_fields(),
        };
        validate(&schema)?;

        tracing::debug!(
            types = schema.types.len(),
            introspection = schema.introspection,
            "schema built"
        );
        Ok(schema)
    }
}

fn build_object(object: Object, auto_camel_case: bool) -> Result<ObjectDefinition, SchemaError> {
    let mut fields = IndexMap::with_capacity(object.fields.len());
    for field in object.fields {
        let name = exposed_name(field.name, auto_camel_case);
        let location = format!("{}.{name}", object.name);
        let ty = parse_type(&field.ty, &location)?;

        let mut arguments = IndexMap::with_capacity(field.arguments.len());
        for argument in field.arguments {
            let argument_name = exposed_name(argument.name, auto_camel_case);
            let argument_location = format!("{location}({argument_name}:)");
            let definition = InputValueDefinition {
                ty: parse_type(&argument.ty, &argument_location)?,
                name: argument_name.clone(),
                description: argument.description,
                default_value: argument.default_value,
                deprecation_reason: argument.deprecation_reason,
            };
            if arguments.insert(argument_name.clone(), definition).is_some() {
                return Err(SchemaError::DuplicateArgument {
                    location,
                    argument: argument_name,
                });
            }
        }

        let definition = FieldDefinition {
            name: name.clone(),
            description: field.description,
            ty,
            arguments,
            resolver: field.resolver,
            permissions: field.permissions,
            deprecation_reason: field.deprecation_reason,
            default_value: field.default_value,
        };
        if name.starts_with("__") {
            return Err(SchemaError::ReservedName(location));
        }
        if fields.insert(name.clone(), definition).is_some() {
            return Err(SchemaError::DuplicateField {
                ty: object.name,
                field: name,
            });
        }
    }

    if fields.is_empty() {
        return Err(SchemaError::EmptyObject(object.name));
    }

    Ok(ObjectDefinition {
        name: object.name,
        description: object.description,
        fields,
    })
}

fn build_enum(enum_type: Enum) -> Result<EnumDefinition, SchemaError> {
    let values: IndexMap<_, _> = enum_type
        .values
        .into_iter()
        .map(|value| {
            (
                value.name.clone(),
                EnumValueDefinition {
                    name: value.name,
                    description: value.description,
                    deprecation_reason: value.deprecation_reason,
                },
            )
        })
        .collect();

    if values.is_empty() {
        return Err(SchemaError::EmptyEnum(enum_type.name));
    }

    Ok(EnumDefinition {
        name: enum_type.name,
        description: enum_type.description,
        values,
    })
}

fn parse_type(ty: &str, location: &str) -> Result<TypeRef, SchemaError> {
    ty.parse().map_err(|_| SchemaError::InvalidTypeRef {
        location: location.to_string(),
        ty: ty.to_string(),
    })
}

fn exposed_name(name: String, auto_camel_case: bool) -> String {
    if auto_camel_case {
        to_camel_case(&name)
    } else {
        name
    }
}

/// `hello_async` becomes `helloAsync`, leading underscores are kept.
pub(crate) fn to_camel_case(name: &str) -> String {
    let body = name.trim_start_matches('_');
    let mut out = String::with_capacity(name.len());
    out.push_str(&name[..name.len() - body.len()]);

    let mut upper = false;
    for c in body.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn validate(schema: &Schema) -> Result<(), SchemaError> {
    for object in schema.types.values().filter_map(TypeDefinition::as_object) {
        for field in object.fields.values() {
            let location = format!("{}.{}", object.name, field.name);
            match schema.type_definition(field.ty.named_type()) {
                None => {
                    return Err(SchemaError::UnknownType {
                        location,
                        ty: field.ty.to_string(),
                    })
                }
                Some(TypeDefinition::Scalar(scalar)) if scalar.kind == ScalarKind::Upload => {
                    return Err(SchemaError::NotOutputType {
                        location,
                        ty: field.ty.to_string(),
                    })
                }
                Some(_) => (),
            }

            for argument in field.arguments.values() {
                let location = format!("{location}({}:)", argument.name);
                match schema.type_definition(argument.ty.named_type()) {
                    None => {
                        return Err(SchemaError::UnknownType {
                            location,
                            ty: argument.ty.to_string(),
                        })
                    }
                    Some(definition) if !definition.is_input() => {
                        return Err(SchemaError::NotInputType {
                            location,
                            ty: argument.ty.to_string(),
                        })
                    }
                    Some(_) => (),
                }
                if let Some(default_value) = &argument.default_value {
                    schema
                        .coerce_input_value(&argument.ty, default_value)
                        .map_err(|err| SchemaError::InvalidDefaultValue { location, err })?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query() -> Object {
        Object::new("Query").field(Field::new("hello", "String!"))
    }

    #[test]
    fn camel_case() {
        assert_eq!(to_camel_case("hello_async"), "helloAsync");
        assert_eq!(to_camel_case("always_fail_with_style"), "alwaysFailWithStyle");
        assert_eq!(to_camel_case("_private_field"), "_privateField");
        assert_eq!(to_camel_case("already"), "already");
    }

    #[test]
    fn names_are_camel_cased_unless_disabled() {
        let query = || {
            Object::new("Query")
                .field(Field::new("hello_async", "String").argument(InputValue::new("first_name", "String")))
        };

        let schema = Schema::build(query()).finish().unwrap();
        let field = schema.field("Query", "helloAsync").unwrap();
        assert!(field.argument("firstName").is_some());

        let schema = Schema::build(query()).auto_camel_case(false).finish().unwrap();
        assert!(schema.field("Query", "hello_async").is_some());
    }

    #[test]
    fn builtin_scalars_are_always_present() {
        let schema = Schema::build(query()).finish().unwrap();
        for name in ["String", "Int", "Float", "Boolean", "ID"] {
            assert!(schema.type_definition(name).is_some(), "{name}");
        }
        assert!(schema.type_definition("Upload").is_none());
    }

    #[test]
    fn upload_scalar_is_added_when_referenced() {
        let mutation = Object::new("Mutation")
            .field(Field::new("read_file", "String").argument(InputValue::new("file", "Upload!")));
        let schema = Schema::build(query()).mutation(mutation).finish().unwrap();
        assert!(schema.type_definition("Upload").is_some());
        assert_eq!(schema.mutation_type(), Some("Mutation"));
    }

    #[test]
    fn rejects_unknown_types() {
        let error = Schema::build(Object::new("Query").field(Field::new("user", "User")))
            .finish()
            .unwrap_err();
        assert_eq!(error.to_string(), "Unknown type 'User' referenced by 'Query.user'");
    }

    #[test]
    fn rejects_invalid_type_syntax() {
        let error = Schema::build(Object::new("Query").field(Field::new("user", "[User")))
            .finish()
            .unwrap_err();
        assert_eq!(error.to_string(), "Invalid type reference '[User' on 'Query.user'");
    }

    #[test]
    fn rejects_object_arguments() {
        let user = Object::new("User").field(Field::new("name", "String"));
        let query = Object::new("Query").field(Field::new("me", "User").argument(InputValue::new("filter", "User")));
        let error = Schema::build(query).register_object(user).finish().unwrap_err();
        assert_eq!(
            error.to_string(),
            "'Query.me(filter:)' must have an input type, but 'User' is an object type"
        );
    }

    #[test]
    fn rejects_duplicates() {
        let error = Schema::build(query())
            .register_object(Object::new("Query").field(Field::new("other", "Int")))
            .finish()
            .unwrap_err();
        assert!(matches!(error, SchemaError::DuplicateType(name) if name == "Query"));

        let error = Schema::build(query().field(Field::new("hello", "Int")))
            .finish()
            .unwrap_err();
        assert!(matches!(error, SchemaError::DuplicateField { .. }));

        let error = Schema::build(query())
            .register_scalar(Scalar::new("String"))
            .finish()
            .unwrap_err();
        assert!(matches!(error, SchemaError::DuplicateType(name) if name == "String"));
    }

    #[test]
    fn rejects_empty_types() {
        let error = Schema::build(query())
            .register_object(Object::new("Empty"))
            .finish()
            .unwrap_err();
        assert!(matches!(error, SchemaError::EmptyObject(name) if name == "Empty"));

        let error = Schema::build(query())
            .register_enum(Enum::new("Color"))
            .finish()
            .unwrap_err();
        assert!(matches!(error, SchemaError::EmptyEnum(name) if name == "Color"));
    }

    #[test]
    fn rejects_reserved_names() {
        let error = Schema::build(query())
            .register_object(Object::new("__Secret").field(Field::new("a", "Int")))
            .finish()
            .unwrap_err();
        assert!(matches!(error, SchemaError::ReservedName(_)));
    }

    #[test]
    fn validates_default_values() {
        let query = Object::new("Query")
            .field(Field::new("greet", "String").argument(InputValue::new("times", "Int").default_value("twice")));
        let error = Schema::build(query).finish().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid default value of 'Query.greet(times:)': Int cannot represent non-integer value: \"twice\""
        );

        let query = Object::new("Query").field(
            Field::new("paint", "String").argument(InputValue::new("color", "Color").default_value(json!("RED"))),
        );
        let schema = Schema::build(query)
            .register_enum(Enum::new("Color").values(["RED", "GREEN"]))
            .finish();
        assert!(schema.is_ok());
    }
}
