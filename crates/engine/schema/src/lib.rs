mod builder;
mod coerce;
mod data;
mod definition;
mod introspection;
mod limits;
mod permission;
mod resolver;
mod scalar;
mod sdl;
mod type_ref;

pub use builder::*;
pub use coerce::*;
pub use data::*;
pub use definition::*;
pub use limits::*;
pub use permission::*;
pub use resolver::*;
pub use scalar::*;
pub use type_ref::*;

use indexmap::IndexMap;

/// A finished schema, see [Schema::build].
pub struct Schema {
    query_type: String,
    mutation_type: Option<String>,
    types: IndexMap<String, TypeDefinition>,
    directives: IndexMap<String, DirectiveDefinition>,
    operation_limits: OperationLimits,
    introspection: bool,
    meta_fields: introspection::MetaFields,
}

impl Schema {
    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn types(&self) -> impl ExactSizeIterator<Item = &TypeDefinition> + '_ {
        self.types.values()
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectDefinition> {
        self.type_definition(name).and_then(TypeDefinition::as_object)
    }

    /// Looks up a field, including the `__typename` meta field available on every object and the
    /// `__schema` and `__type` introspection fields of the query root.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        let object = self.object(type_name)?;
        match field_name {
            "__typename" => Some(&self.meta_fields.typename),
            "__schema" if self.is_introspection_root(type_name) => Some(&self.meta_fields.schema),
            "__type" if self.is_introspection_root(type_name) => Some(&self.meta_fields.type_),
            _ => object.field(field_name),
        }
    }

    fn is_introspection_root(&self, type_name: &str) -> bool {
        self.introspection && type_name == self.query_type
    }

    pub fn directives(&self) -> impl ExactSizeIterator<Item = &DirectiveDefinition> + '_ {
        self.directives.values()
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directives.get(name)
    }

    pub fn operation_limits(&self) -> &OperationLimits {
        &self.operation_limits
    }

    pub fn introspection_enabled(&self) -> bool {
        self.introspection
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("query_type", &self.query_type)
            .field("mutation_type", &self.mutation_type)
            .field("types", &self.types.len())
            .field("introspection", &self.introspection)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use error::ErrorPath;
    use futures::executor::block_on;
    use indoc::indoc;
    use serde_json::{json, Value};

    use super::*;

    fn schema() -> Schema {
        let query = Object::new("Query")
            .description("Entry point")
            .field(
                Field::new("hello", "String!")
                    .argument(InputValue::new("name", "String").default_value("world"))
                    .resolve_sync(|ctx| {
                        let name = ctx.argument::<String>("name")?.unwrap_or_default();
                        Ok(Value::String(format!("Hello {name}")))
                    }),
            )
            .field(Field::new("hello_async", "String!").resolve_async(|_ctx| async { Ok(json!("Hello async")) }))
            .field(Field::new("favorite_color", "Color").deprecated("Nobody cares"))
            .field(Field::new("legacy", "Int").deprecated("No longer supported"));

        Schema::build(query)
            .register_enum(
                Enum::new("Color")
                    .value("RED")
                    .value(EnumValue::new("BLUE").description("Like the sky")),
            )
            .register_scalar(Scalar::new("JSON").specified_by_url("https://www.rfc-editor.org/rfc/rfc8259"))
            .finish()
            .unwrap()
    }

    fn context(
        schema: &Arc<Schema>,
        parent_type: &str,
        field: &str,
        parent: Value,
        arguments: Value,
    ) -> ResolverContext {
        let Value::Object(arguments) = arguments else {
            unreachable!()
        };
        ResolverContext::new(
            schema.clone(),
            RequestScope::default(),
            parent_type,
            field,
            Arc::new(parent),
            Arc::new(arguments),
            ErrorPath::root().child(field),
        )
    }

    fn resolve(schema: &Arc<Schema>, parent_type: &str, field: &str, parent: Value, arguments: Value) -> Value {
        let ctx = context(schema, parent_type, field, parent, arguments);
        match &schema.field(parent_type, field).unwrap().resolver {
            Resolver::Sync(resolver) => resolver(&ctx).unwrap(),
            Resolver::Async(resolver) => block_on(resolver(ctx)).unwrap(),
            Resolver::Default => ctx.parent().get(field).cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn sdl() {
        insta::assert_snapshot!(schema().sdl(), @r###"
        """Entry point"""
        type Query {
          hello(name: String = "world"): String!
          helloAsync: String!
          favoriteColor: Color @deprecated(reason: "Nobody cares")
          legacy: Int @deprecated
        }

        enum Color {
          RED
          """Like the sky"""
          BLUE
        }

        scalar JSON @specifiedBy(url: "https://www.rfc-editor.org/rfc/rfc8259")
        "###);
    }

    #[test]
    fn sdl_with_custom_roots() {
        let schema = Schema::build(Object::new("Root").field(Field::new("ok", "Boolean")))
            .finish()
            .unwrap();
        assert_eq!(
            schema.sdl(),
            indoc! {"
                schema {
                  query: Root
                }

                type Root {
                  ok: Boolean
                }
            "}
        );
    }

    #[test]
    fn resolvers() {
        let schema = Arc::new(schema());
        assert!(schema.field("Query", "helloAsync").unwrap().resolver.is_async());
        assert_eq!(
            resolve(&schema, "Query", "hello", json!({}), json!({"name": "Ada"})),
            json!("Hello Ada")
        );
        assert_eq!(
            resolve(&schema, "Query", "helloAsync", json!({}), json!({})),
            json!("Hello async")
        );
    }

    #[test]
    fn meta_fields() {
        let schema = Arc::new(schema());
        assert_eq!(
            resolve(&schema, "Query", "__typename", json!({}), json!({})),
            json!("Query")
        );
        assert!(schema.field("Query", "__schema").is_some());
        assert!(schema.field("__Type", "__schema").is_none());
        assert!(schema.field("__Type", "__typename").is_some());
        assert!(schema.field("Color", "__typename").is_none());

        let schema = Schema::build(Object::new("Query").field(Field::new("a", "Int")))
            .disable_introspection()
            .finish()
            .unwrap();
        assert!(schema.field("Query", "__schema").is_none());
        assert!(schema.field("Query", "__typename").is_some());
    }

    #[test]
    fn introspection_type_resolvers() {
        let schema = Arc::new(schema());
        let ty = resolve(&schema, "Query", "__type", json!({}), json!({"name": "Query"}));
        assert_eq!(ty, json!({"__ref": "Query"}));
        assert_eq!(
            resolve(&schema, "Query", "__type", json!({}), json!({"name": "Missing"})),
            Value::Null
        );

        assert_eq!(resolve(&schema, "__Type", "kind", ty.clone(), json!({})), json!("OBJECT"));
        assert_eq!(
            resolve(&schema, "__Type", "description", ty.clone(), json!({})),
            json!("Entry point")
        );

        let fields = resolve(&schema, "__Type", "fields", ty.clone(), json!({"includeDeprecated": false}));
        let names: Vec<_> = fields.as_array().unwrap().iter().map(|field| field["name"].clone()).collect();
        assert_eq!(names, vec![json!("hello"), json!("helloAsync")]);
        assert_eq!(fields[0]["args"][0]["defaultValue"], json!("\"world\""));
        assert_eq!(fields[0]["type"], json!({"__ref": "String!"}));

        let fields = resolve(&schema, "__Type", "fields", ty, json!({"includeDeprecated": true}));
        assert_eq!(fields.as_array().unwrap().len(), 4);

        let non_null = json!({"__ref": "[Int!]!"});
        assert_eq!(resolve(&schema, "__Type", "kind", non_null.clone(), json!({})), json!("NON_NULL"));
        assert_eq!(resolve(&schema, "__Type", "name", non_null.clone(), json!({})), Value::Null);
        assert_eq!(
            resolve(&schema, "__Type", "ofType", non_null, json!({})),
            json!({"__ref": "[Int!]"})
        );

        let color = json!({"__ref": "Color"});
        let values = resolve(&schema, "__Type", "enumValues", color.clone(), json!({}));
        assert_eq!(values[1]["description"], json!("Like the sky"));
        assert_eq!(resolve(&schema, "__Type", "fields", color, json!({})), Value::Null);
    }

    #[test]
    fn schema_introspection() {
        let schema = Arc::new(schema());
        let value = resolve(&schema, "Query", "__schema", json!({}), json!({}));
        assert_eq!(value["queryType"], json!({"__ref": "Query"}));
        assert_eq!(value["mutationType"], Value::Null);

        let directives: Vec<_> = value["directives"]
            .as_array()
            .unwrap()
            .iter()
            .map(|directive| directive["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(directives, ["include", "skip", "deprecated"]);
        assert_eq!(
            value["directives"][2]["args"][0]["defaultValue"],
            json!("\"No longer supported\"")
        );

        assert!(value["types"]
            .as_array()
            .unwrap()
            .contains(&json!({"__ref": "__TypeKind"})));
    }
}
