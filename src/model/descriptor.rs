// ==============================================================================
// Descriptor Loading: protobuf.js JSON → Reflection Graph
// ==============================================================================
//
// Reads the JSON produced by protobuf.js `Root#toJSON()` (or `pbjs -t json`).
// The document is a tree of namespaces under `nested` keys; a node with
// `fields` is a message, a node with `values` is an enum, and anything else
// carrying `nested` is a namespace. Services and extensions are skipped.
//
// Loading happens in two passes. The first walks the tree and collects every
// type with its raw (possibly relative) type references. The second resolves
// those references using protobuf scoping rules, which needs the complete set
// of names, and derives field presence, which needs to know whether a
// referenced type is a message or an enum.

use std::collections::HashSet;
use std::path::Path;

use miette::Context;
use serde_json::{Map, Value};

use crate::error::{ConvertError, ParseDiagnostic};
use crate::model::proto::{
    FieldType, ProtoEnum, ProtoField, ProtoMessage, ProtoNode, ProtoOneOf, ProtoRoot,
    parent_scope,
};
use crate::scalar::ScalarKind;

/// Parse JSON that may contain C-style comments, as hand-maintained
/// descriptor files often do.
fn parse_json_with_comments(input: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_reader(
        json_comments::CommentSettings::c_style().strip_comments(input.as_bytes()),
    )
}

/// Load a descriptor file into a fresh root.
pub fn load_descriptor(path: &Path) -> miette::Result<ProtoRoot> {
    let mut root = ProtoRoot::new();
    load_descriptor_into(&mut root, path)?;
    Ok(root)
}

/// Load a descriptor file, adding its types to `root`. References may point
/// at types loaded earlier.
pub fn load_descriptor_into(root: &mut ProtoRoot, path: &Path) -> miette::Result<()> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("{e}"))
        .with_context(|| format!("read {}", path.display()))?;
    load_descriptor_str_into(root, &source, &path.display().to_string())
}

/// Load descriptor JSON from a string into a fresh root.
pub fn load_descriptor_str(source: &str, source_name: &str) -> miette::Result<ProtoRoot> {
    let mut root = ProtoRoot::new();
    load_descriptor_str_into(&mut root, source, source_name)?;
    Ok(root)
}

/// Load descriptor JSON from a string, adding its types to `root`.
pub fn load_descriptor_str_into(
    root: &mut ProtoRoot,
    source: &str,
    source_name: &str,
) -> miette::Result<()> {
    let json = parse_json_with_comments(source).map_err(|e| ParseDiagnostic {
        src: miette::NamedSource::new(source_name, source.to_string()),
        span: error_span(source, e.line(), e.column()),
        message: format!("invalid descriptor JSON: {e}"),
        label: Some("here".to_string()),
        help: None,
    })?;

    load_value_into(root, &json)
        .map_err(miette::Report::new)
        .with_context(|| format!("load descriptor {source_name}"))
}

/// Convert a serde_json (1-based line, 1-based column) position into a
/// one-character span.
fn error_span(source: &str, line: usize, column: usize) -> miette::SourceSpan {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let offset = (line_start + column.saturating_sub(1)).min(source.len());
    let len = usize::from(offset < source.len());
    (offset, len).into()
}

// ==============================================================================
// Pass 1: Collect
// ==============================================================================

struct RawField {
    name: String,
    type_name: String,
    rule: Option<String>,
    map_key: Option<ScalarKind>,
    proto3_optional: bool,
    oneof: Option<String>,
    comment: Option<String>,
}

struct RawMessage {
    name: String,
    fields: Vec<RawField>,
    oneofs: Vec<ProtoOneOf>,
    comment: Option<String>,
}

enum RawNode {
    Message(RawMessage),
    Enum(ProtoEnum),
}

impl RawNode {
    fn name(&self) -> &str {
        match self {
            RawNode::Message(m) => &m.name,
            RawNode::Enum(e) => &e.name,
        }
    }
}

/// Load an already-parsed descriptor document into `root`.
pub fn load_value_into(root: &mut ProtoRoot, json: &Value) -> Result<(), ConvertError> {
    let mut raw = Vec::new();
    let top = json
        .as_object()
        .ok_or_else(|| ConvertError::malformed("descriptor root must be a JSON object"))?;
    collect_nested(top, "", &mut raw)?;

    let resolved: Vec<ProtoNode> = raw
        .iter()
        .map(|node| resolve_node(node, &raw, root))
        .collect::<Result<_, _>>()?;

    // Check every name before inserting any, so a failed load leaves `root`
    // as it was.
    let mut names = HashSet::with_capacity(resolved.len());
    for node in &resolved {
        if root.contains(node.name()) || !names.insert(node.name()) {
            return Err(ConvertError::malformed(format!(
                "duplicate type name: {}",
                node.name()
            )));
        }
    }
    for node in resolved {
        root.insert(node).map_err(ConvertError::malformed)?;
    }
    Ok(())
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

fn comment_of(obj: &Map<String, Value>) -> Option<String> {
    obj.get("comment")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|c| !c.trim().is_empty())
}

fn collect_nested(
    obj: &Map<String, Value>,
    scope: &str,
    out: &mut Vec<RawNode>,
) -> Result<(), ConvertError> {
    let Some(nested) = obj.get("nested") else {
        return Ok(());
    };
    let nested = nested
        .as_object()
        .ok_or_else(|| ConvertError::malformed(format!("`nested` of `{scope}` is not an object")))?;

    for (name, child) in nested {
        let Some(child) = child.as_object() else {
            return Err(ConvertError::malformed(format!(
                "`{}` is not an object",
                qualify(scope, name)
            )));
        };
        let qualified = qualify(scope, name);
        if child.contains_key("fields") {
            out.push(RawNode::Message(collect_message(&qualified, child)?));
            collect_nested(child, &qualified, out)?;
        } else if child.contains_key("values") {
            out.push(RawNode::Enum(collect_enum(&qualified, child)?));
        } else {
            // Namespaces, services, extensions: only nested types matter.
            collect_nested(child, &qualified, out)?;
        }
    }
    Ok(())
}

fn collect_message(name: &str, obj: &Map<String, Value>) -> Result<RawMessage, ConvertError> {
    let fields_json = obj
        .get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| ConvertError::malformed(format!("`fields` of `{name}` is not an object")))?;

    let mut fields = Vec::with_capacity(fields_json.len());
    for (field_name, field) in fields_json {
        let field = field.as_object().ok_or_else(|| {
            ConvertError::malformed(format!("field `{name}.{field_name}` is not an object"))
        })?;
        let type_name = field
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ConvertError::malformed(format!("field `{name}.{field_name}` has no type")))?;
        let map_key = match field.get("keyType").and_then(Value::as_str) {
            None => None,
            Some(key) => match ScalarKind::from_name(key) {
                Some(kind) if kind.is_valid_map_key() => Some(kind),
                _ => {
                    return Err(ConvertError::malformed(format!(
                        "map field `{name}.{field_name}` has invalid key type `{key}`"
                    )));
                }
            },
        };
        let proto3_optional = field
            .get("options")
            .and_then(|o| o.get("proto3_optional"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        fields.push(RawField {
            name: field_name.clone(),
            type_name: type_name.to_string(),
            rule: field.get("rule").and_then(Value::as_str).map(str::to_string),
            map_key,
            proto3_optional,
            oneof: None,
            comment: comment_of(field),
        });
    }

    let mut oneofs = Vec::new();
    if let Some(groups) = obj.get("oneofs").and_then(Value::as_object) {
        for (group_name, group) in groups {
            let members: Vec<String> = group
                .get("oneof")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    ConvertError::malformed(format!("oneof `{name}.{group_name}` has no members"))
                })?
                .iter()
                .map(|m| {
                    m.as_str().map(str::to_string).ok_or_else(|| {
                        ConvertError::malformed(format!(
                            "oneof `{name}.{group_name}` has a non-string member"
                        ))
                    })
                })
                .collect::<Result<_, _>>()?;

            // proto3 `optional` is encoded as a single-member synthetic oneof
            // named after the field with a leading underscore.
            let synthetic = group_name.starts_with('_')
                && members.len() == 1
                && fields
                    .iter()
                    .any(|f| f.name == members[0] && f.proto3_optional);
            if synthetic {
                continue;
            }

            for member in &members {
                let field = fields.iter_mut().find(|f| &f.name == member).ok_or_else(|| {
                    ConvertError::malformed(format!(
                        "oneof `{name}.{group_name}` names unknown field `{member}`"
                    ))
                })?;
                field.oneof = Some(group_name.clone());
            }
            oneofs.push(ProtoOneOf {
                name: group_name.clone(),
                fields: members,
                comment: group.as_object().and_then(comment_of),
            });
        }
    }

    Ok(RawMessage {
        name: name.to_string(),
        fields,
        oneofs,
        comment: comment_of(obj),
    })
}

fn collect_enum(name: &str, obj: &Map<String, Value>) -> Result<ProtoEnum, ConvertError> {
    let values_json = obj
        .get("values")
        .and_then(Value::as_object)
        .ok_or_else(|| ConvertError::malformed(format!("`values` of `{name}` is not an object")))?;

    let mut enm = ProtoEnum::new(name);
    enm.comment = comment_of(obj);
    for (symbol, number) in values_json {
        let number = number
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| {
                ConvertError::malformed(format!(
                    "enum value `{name}.{symbol}` is not a 32-bit integer"
                ))
            })?;
        enm.values.insert(symbol.clone(), number);
    }
    if let Some(comments) = obj.get("comments").and_then(Value::as_object) {
        for (symbol, comment) in comments {
            if let Some(text) = comment.as_str().filter(|c| !c.trim().is_empty()) {
                enm.comments.insert(symbol.clone(), text.to_string());
            }
        }
    }
    Ok(enm)
}

// ==============================================================================
// Pass 2: Resolve
// ==============================================================================

enum Known {
    Message,
    Enum,
}

fn known_kind(name: &str, raw: &[RawNode], root: &ProtoRoot) -> Option<Known> {
    if let Some(node) = raw.iter().find(|n| n.name() == name) {
        return Some(match node {
            RawNode::Message(_) => Known::Message,
            RawNode::Enum(_) => Known::Enum,
        });
    }
    root.lookup(name).map(|node| match node {
        ProtoNode::Message(_) => Known::Message,
        ProtoNode::Enum(_) => Known::Enum,
    })
}

/// Resolve a type reference written inside message `scope` to a qualified
/// name: innermost scope first, walking outwards. A leading dot marks an
/// absolute name. Unknown names come back unchanged.
fn resolve_reference(scope: &str, reference: &str, raw: &[RawNode], root: &ProtoRoot) -> String {
    if let Some(absolute) = reference.strip_prefix('.') {
        return absolute.to_string();
    }
    let mut scope = scope;
    loop {
        let candidate = qualify(scope, reference);
        if known_kind(&candidate, raw, root).is_some() {
            return candidate;
        }
        if scope.is_empty() {
            return reference.to_string();
        }
        scope = parent_scope(scope);
    }
}

fn resolve_node(node: &RawNode, raw: &[RawNode], root: &ProtoRoot) -> Result<ProtoNode, ConvertError> {
    let message = match node {
        RawNode::Enum(enm) => return Ok(ProtoNode::Enum(enm.clone())),
        RawNode::Message(message) => message,
    };

    let mut fields = Vec::with_capacity(message.fields.len());
    for raw_field in &message.fields {
        let field_type = match FieldType::parse(&raw_field.type_name) {
            FieldType::Named(reference) => {
                FieldType::Named(resolve_reference(&message.name, &reference, raw, root))
            }
            scalar => scalar,
        };

        let repeated = raw_field.rule.as_deref() == Some("repeated");
        if repeated && raw_field.map_key.is_some() {
            return Err(ConvertError::malformed(format!(
                "map field `{}.{}` cannot be repeated",
                message.name, raw_field.name
            )));
        }

        let singular_message = !repeated
            && raw_field.map_key.is_none()
            && matches!(&field_type, FieldType::Named(n)
                if !matches!(known_kind(n, raw, root), Some(Known::Enum)));
        let has_presence = raw_field.rule.as_deref() == Some("optional")
            || raw_field.proto3_optional
            || raw_field.oneof.is_some()
            || singular_message;
        let required = raw_field.rule.as_deref() == Some("required") || !has_presence;

        fields.push(ProtoField {
            name: raw_field.name.clone(),
            field_type,
            repeated,
            required,
            oneof: raw_field.oneof.clone(),
            map_key: raw_field.map_key,
            comment: raw_field.comment.clone(),
        });
    }

    Ok(ProtoNode::Message(ProtoMessage {
        name: message.name.clone(),
        fields,
        oneofs: message.oneofs.clone(),
        is_input: false,
        comment: message.comment.clone(),
    }))
}
