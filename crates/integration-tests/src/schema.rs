//! The schema served by the view tests.

use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use engine::schema::{Data, Field, FieldError, InputValue, Object, Permission, ResolverContext, Schema};
use serde_json::{json, Value};

pub struct AlwaysFailPermission;

impl Permission for AlwaysFailPermission {
    fn message(&self) -> Cow<'_, str> {
        "You are not authorized".into()
    }

    fn has_permission(&self, _source: &Value, _ctx: &ResolverContext) -> bool {
        false
    }
}

/// Stored examples, shared with resolvers through the request data.
#[derive(Debug, Default, Clone)]
pub struct Examples {
    names: Arc<Mutex<Vec<String>>>,
    async_reads: Arc<AtomicUsize>,
}

impl Examples {
    pub fn create(&self, name: &str) {
        self.names.lock().unwrap().push(name.to_string());
    }

    /// How many times `exampleAsync` ran.
    pub fn async_reads(&self) -> usize {
        self.async_reads.load(Ordering::SeqCst)
    }

    fn first(&self) -> Option<String> {
        self.names.lock().unwrap().first().cloned()
    }
}

fn first_example(ctx: &ResolverContext) -> Result<Value, FieldError> {
    let examples = ctx.data::<Examples>().ok_or("no examples available")?;
    Ok(examples.first().map(Value::String).unwrap_or(Value::Null))
}

pub fn schema() -> Schema {
    Schema::build(
        Object::new("Query")
            .field(Field::new("hello", "String!"))
            .field(Field::new("hello_async", "String!").resolve_async(|_| async { Ok(json!("async strawberry")) }))
            .field(
                Field::new("always_fail", "String")
                    .permission(AlwaysFailPermission)
                    .resolve_sync(|_| Ok(json!("Hey"))),
            )
            .field(Field::new("example", "String!").resolve_sync(first_example))
            .field(Field::new("example_async", "String!").resolve_async(|ctx| async move {
                if let Some(examples) = ctx.data::<Examples>() {
                    examples.async_reads.fetch_add(1, Ordering::SeqCst);
                }
                first_example(&ctx)
            }))
            .field(
                Field::new("header", "String")
                    .argument(InputValue::new("name", "String!"))
                    .resolve_sync(|ctx| {
                        let name = ctx.argument::<String>("name")?.unwrap_or_default();
                        let value = ctx
                            .data::<http::HeaderMap>()
                            .and_then(|headers| headers.get(&name))
                            .and_then(|value| value.to_str().ok())
                            .map(|value| Value::String(value.to_string()));
                        Ok(value.unwrap_or(Value::Null))
                    }),
            )
            .field(
                Field::new("echo", "String")
                    .argument(InputValue::new("message", "String!"))
                    .resolve_sync(|ctx| Ok(json!(ctx.argument::<String>("message")?))),
            ),
    )
    .mutation(
        Object::new("Mutation")
            .field(
                Field::new("read_text", "String!")
                    .argument(InputValue::new("text_file", "Upload!"))
                    .resolve_sync(|ctx| {
                        let file = ctx.upload("textFile").ok_or("missing file")?;
                        Ok(json!(String::from_utf8_lossy(&file.content)))
                    }),
            )
            .field(
                Field::new("read_files", "[String!]!")
                    .argument(InputValue::new("files", "[Upload!]!"))
                    .resolve_sync(|ctx| {
                        let files = ctx.argument::<Vec<Value>>("files")?.unwrap_or_default();
                        files
                            .iter()
                            .map(|file| {
                                let file = ctx.resolve_upload(file).ok_or("missing file")?;
                                Ok(json!(format!("{}: {}", file.filename, String::from_utf8_lossy(&file.content))))
                            })
                            .collect::<Result<Vec<_>, FieldError>>()
                            .map(Value::Array)
                    }),
            ),
    )
    .finish()
    .unwrap()
}

/// Request data holding the examples.
pub fn context(examples: &Examples) -> Data {
    Data::default().with(examples.clone())
}
