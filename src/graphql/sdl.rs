// ==============================================================================
// SDL Printing
// ==============================================================================
//
// Prints one named type in the layout graphql-js `printType` uses: two-space
// indentation, block-string descriptions, and no braces for a type with no
// fields. Object fields are expected to be resolved before printing; a still
// deferred object prints as if it had no fields.

use std::fmt::Write;

use super::types::{FieldDef, NamedType, ObjectType};

/// Print a named type as an SDL definition.
pub fn print_type(ty: &NamedType) -> String {
    let mut out = String::new();
    match ty {
        NamedType::Object(o) => print_object(&mut out, "type", o),
        NamedType::InputObject(o) => print_object(&mut out, "input", o),
        NamedType::Enum(e) => {
            print_description(&mut out, e.description.as_deref(), "");
            write!(out, "enum {}", e.name).expect("write to String is infallible");
            if !e.values.is_empty() {
                out.push_str(" {\n");
                for value in &e.values {
                    print_description(&mut out, value.description.as_deref(), "  ");
                    writeln!(out, "  {}", value.name).expect("write to String is infallible");
                }
                out.push('}');
            }
        }
        NamedType::Union(u) => {
            print_description(&mut out, u.description.as_deref(), "");
            write!(out, "union {}", u.name).expect("write to String is infallible");
            if !u.members.is_empty() {
                let members: Vec<String> = u.members.iter().map(ToString::to_string).collect();
                write!(out, " = {}", members.join(" | ")).expect("write to String is infallible");
            }
        }
    }
    out
}

fn print_object(out: &mut String, keyword: &str, object: &ObjectType) {
    print_description(out, object.description.as_deref(), "");
    write!(out, "{keyword} {}", object.name).expect("write to String is infallible");
    let fields = object.resolved_fields().unwrap_or_default();
    if fields.is_empty() {
        return;
    }
    out.push_str(" {\n");
    for field in fields {
        print_field(out, field);
    }
    out.push('}');
}

fn print_field(out: &mut String, field: &FieldDef) {
    print_description(out, field.description.as_deref(), "  ");
    writeln!(out, "  {}: {}", field.name, field.ty).expect("write to String is infallible");
}

/// Print a block-string description followed by a newline.
fn print_description(out: &mut String, description: Option<&str>, indent: &str) {
    let Some(text) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return;
    };
    let escaped = text.replace("\"\"\"", "\\\"\"\"");
    if !escaped.contains('\n') && !escaped.ends_with('"') && !escaped.ends_with('\\') {
        writeln!(out, "{indent}\"\"\"{escaped}\"\"\"").expect("write to String is infallible");
        return;
    }
    writeln!(out, "{indent}\"\"\"").expect("write to String is infallible");
    for line in escaped.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            writeln!(out, "{indent}{line}").expect("write to String is infallible");
        }
    }
    writeln!(out, "{indent}\"\"\"").expect("write to String is infallible");
}
