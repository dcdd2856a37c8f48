use std::fmt::Write;

use crate::{introspection::print_value, InputValueDefinition, ScalarKind, Schema, TypeDefinition};

impl Schema {
    /// Prints the schema in SDL, without built-in scalars, directives and introspection types.
    pub fn sdl(&self) -> String {
        let mut blocks = Vec::new();

        let conventional_roots =
            self.query_type == "Query" && matches!(self.mutation_type.as_deref(), None | Some("Mutation"));
        if !conventional_roots {
            let mut block = format!("schema {{\n  query: {}\n", self.query_type);
            if let Some(mutation) = &self.mutation_type {
                let _ = writeln!(block, "  mutation: {mutation}");
            }
            block.push('}');
            blocks.push(block);
        }

        for definition in self.types.values() {
            if definition.name().starts_with("__") {
                continue;
            }
            let mut block = String::new();
            print_description(&mut block, definition.description(), "");
            match definition {
                TypeDefinition::Scalar(scalar) => {
                    if ScalarKind::BUILTINS.contains(&scalar.kind) {
                        continue;
                    }
                    let _ = write!(block, "scalar {}", scalar.name);
                    if let Some(url) = &scalar.specified_by_url {
                        let _ = write!(block, " @specifiedBy(url: {})", serde_json::Value::from(url.as_str()));
                    }
                }
                TypeDefinition::Object(object) => {
                    let _ = writeln!(block, "type {} {{", object.name);
                    for field in object.fields.values() {
                        print_description(&mut block, field.description.as_deref(), "  ");
                        let _ = write!(block, "  {}", field.name);
                        self.print_arguments(&mut block, field.arguments.values());
                        let _ = write!(block, ": {}", field.ty);
                        print_deprecated(&mut block, field.deprecation_reason.as_deref());
                        block.push('\n');
                    }
                    block.push('}');
                }
                TypeDefinition::Enum(enum_definition) => {
                    let _ = writeln!(block, "enum {} {{", enum_definition.name);
                    for value in enum_definition.values.values() {
                        print_description(&mut block, value.description.as_deref(), "  ");
                        let _ = write!(block, "  {}", value.name);
                        print_deprecated(&mut block, value.deprecation_reason.as_deref());
                        block.push('\n');
                    }
                    block.push('}');
                }
            }
            blocks.push(block);
        }

        let mut sdl = blocks.join("\n\n");
        sdl.push('\n');
        sdl
    }

    fn print_arguments<'a>(&self, out: &mut String, arguments: impl Iterator<Item = &'a InputValueDefinition>) {
        let arguments: Vec<_> = arguments
            .map(|argument| {
                let mut printed = format!("{}: {}", argument.name, argument.ty);
                if let Some(default_value) = &argument.default_value {
                    let _ = write!(printed, " = {}", print_value(self, &argument.ty, default_value));
                }
                print_deprecated(&mut printed, argument.deprecation_reason.as_deref());
                printed
            })
            .collect();
        if !arguments.is_empty() {
            let _ = write!(out, "({})", arguments.join(", "));
        }
    }
}

fn print_description(out: &mut String, description: Option<&str>, indent: &str) {
    let Some(description) = description else {
        return;
    };
    if description.contains('\n') {
        let _ = writeln!(out, "{indent}\"\"\"");
        for line in description.lines() {
            let _ = writeln!(out, "{indent}{line}");
        }
        let _ = writeln!(out, "{indent}\"\"\"");
    } else {
        let _ = writeln!(out, "{indent}\"\"\"{description}\"\"\"");
    }
}

fn print_deprecated(out: &mut String, reason: Option<&str>) {
    match reason {
        None => (),
        Some("No longer supported") => out.push_str(" @deprecated"),
        Some(reason) => {
            let _ = write!(out, " @deprecated(reason: {})", serde_json::Value::from(reason));
        }
    }
}
