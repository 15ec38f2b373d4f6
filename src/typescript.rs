// ==============================================================================
// TypeScript Declaration Builder
// ==============================================================================
//
// Emits one exported declaration per message/enum of the supplied list, in
// visitation order. Unlike the GraphQL path, referenced types are not queued:
// a field typed by another message emits that message's name, and it is the
// caller's job to supply the full closure. References to types outside the
// list still resolve to a name (and would dangle in the emitted source); each
// one is reported once as a warning.
//
// Map fields are the exception: their synthesized entry messages are
// declared at the point they are first encountered, which is ahead of the
// enclosing message since that one is registered only once its body is done.

use std::collections::HashSet;
use std::fmt::Write;

use crate::comments::{CommentFormatter, JsDocComments};
use crate::error::{ConvertError, Warning};
use crate::map_field::synthesize_map_message;
use crate::model::proto::{
    FieldType, ProtoEnum, ProtoField, ProtoMessage, ProtoNode, ProtoRoot, lookup_node,
};
use crate::registry::TypeRegistry;
use crate::scalar::ScalarMapping;
use crate::suggest::suggest_similar_name;

/// Result of a TypeScript pass.
pub struct TypeScriptOutput {
    /// Declarations separated by blank lines.
    pub source: String,
    /// Non-fatal warnings, such as dangling type references.
    ///
    /// Each warning is a [`miette::Report`] with `Severity::Warning` set.
    pub warnings: Vec<miette::Report>,
}

impl std::fmt::Debug for TypeScriptOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeScriptOutput")
            .field("source", &self.source)
            .field(
                "warnings",
                &format_args!("[{} warnings]", self.warnings.len()),
            )
            .finish()
    }
}

/// Builds TypeScript interface and enum declarations from proto types.
pub struct TypeScriptDeclarationBuilder<'a, C = JsDocComments> {
    root: &'a ProtoRoot,
    messages: &'a [ProtoNode],
    scalars: ScalarMapping,
    comments: C,
    registry: TypeRegistry<String>,
    warnings: Vec<miette::Report>,
    warned: HashSet<String>,
}

impl<'a> TypeScriptDeclarationBuilder<'a> {
    pub fn new(root: &'a ProtoRoot, messages: &'a [ProtoNode]) -> Self {
        TypeScriptDeclarationBuilder {
            root,
            messages,
            scalars: ScalarMapping::default(),
            comments: JsDocComments,
            registry: TypeRegistry::new(),
            warnings: Vec::new(),
            warned: HashSet::new(),
        }
    }
}

impl<'a, C: CommentFormatter> TypeScriptDeclarationBuilder<'a, C> {
    #[must_use]
    pub fn with_scalars(mut self, scalars: ScalarMapping) -> Self {
        self.scalars = scalars;
        self
    }

    /// Swap the comment formatter.
    pub fn with_comments<D: CommentFormatter>(self, comments: D) -> TypeScriptDeclarationBuilder<'a, D> {
        TypeScriptDeclarationBuilder {
            root: self.root,
            messages: self.messages,
            scalars: self.scalars,
            comments,
            registry: self.registry,
            warnings: self.warnings,
            warned: self.warned,
        }
    }

    /// Emit a declaration for every node of the supplied list.
    pub fn build(&mut self) -> Result<(), ConvertError> {
        for node in self.messages {
            self.handle_node(node)?;
        }
        Ok(())
    }

    /// Declare a node unless its qualified name already has a declaration.
    fn handle_node(&mut self, node: &ProtoNode) -> Result<(), ConvertError> {
        if self.registry.contains(node.name()) {
            return Ok(());
        }
        let declaration = match node {
            ProtoNode::Enum(enm) => self.create_enum_type(enm),
            ProtoNode::Message(message) => self.create_message_type(message)?,
        };
        self.registry
            .register(node.name(), declaration)
            .map_err(ConvertError::malformed)?;
        Ok(())
    }

    fn create_message_type(&mut self, message: &ProtoMessage) -> Result<String, ConvertError> {
        let mut properties = Vec::with_capacity(message.fields.len());
        let mut seen_groups = HashSet::new();
        for field in &message.fields {
            match &field.oneof {
                Some(group) => {
                    if seen_groups.insert(group.as_str()) {
                        properties.push(self.create_oneof_item(message, group)?);
                    }
                }
                None => properties.push(self.create_type_item(message, field)?),
            }
        }

        let mut out = self.comments.format(message.comment.as_deref(), false);
        write!(out, "export interface {}", message.simple_name()).expect("write to String is infallible");
        if properties.is_empty() {
            out.push_str(" {}");
            return Ok(out);
        }
        out.push_str(" {\n");
        for property in properties {
            writeln!(out, "  {property};").expect("write to String is infallible");
        }
        out.push('}');
        Ok(out)
    }

    fn create_type_item(&mut self, message: &ProtoMessage, field: &ProtoField) -> Result<String, ConvertError> {
        // Empty repeated fields are absent from encoded payloads, so they are
        // optional even without presence tracking.
        let optional = if !field.is_required() || field.repeated { "?" } else { "" };
        let comment = self.comments.format(field.comment.as_deref(), true);
        let value = self.create_type_value(message, field)?;
        Ok(format!("{comment}{}{optional}: {value}", field.name))
    }

    fn create_oneof_item(&mut self, message: &ProtoMessage, group: &str) -> Result<String, ConvertError> {
        let oneof = message.oneof(group);
        let members: Vec<&ProtoField> = match oneof {
            Some(oneof) => oneof
                .fields
                .iter()
                .map(|name| {
                    message.find_field(name).ok_or_else(|| {
                        ConvertError::malformed(format!(
                            "oneof `{}.{group}` names unknown field `{name}`",
                            message.name
                        ))
                    })
                })
                .collect::<Result<_, _>>()?,
            None => message
                .fields
                .iter()
                .filter(|f| f.oneof.as_deref() == Some(group))
                .collect(),
        };

        let mut types = Vec::with_capacity(members.len());
        for member in members {
            let ty = self.create_type_value(message, member)?;
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        let comment = self
            .comments
            .format(oneof.and_then(|o| o.comment.as_deref()), true);
        Ok(format!("{comment}{group}: {}", types.join(" | ")))
    }

    fn create_type_value(&mut self, message: &ProtoMessage, field: &ProtoField) -> Result<String, ConvertError> {
        let base = if field.is_map() {
            self.handle_map_value(message, field)?
        } else {
            match &field.field_type {
                FieldType::Scalar(kind) => self.scalars.typescript(*kind).as_str().to_string(),
                FieldType::Named(name) => self.reference_name(name)?,
            }
        };
        Ok(if field.repeated { format!("{base}[]") } else { base })
    }

    fn handle_map_value(&mut self, message: &ProtoMessage, field: &ProtoField) -> Result<String, ConvertError> {
        let entry = synthesize_map_message(message, field).ok_or_else(|| {
            ConvertError::malformed(format!("`{}.{}` is not a map", message.name, field.name))
        })?;
        let name = entry.simple_name().to_string();
        self.handle_node(&ProtoNode::Message(entry))?;
        Ok(name)
    }

    /// The simple name a type reference emits as.
    fn reference_name(&mut self, name: &str) -> Result<String, ConvertError> {
        let node = lookup_node(self.messages, self.root, name).ok_or_else(|| {
            let known = self
                .messages
                .iter()
                .map(ProtoNode::name)
                .chain(self.root.names());
            ConvertError::TypeNotFound {
                name: name.trim_start_matches('.').to_string(),
                help: suggest_similar_name(name, known),
            }
        })?;

        let queued = self.messages.iter().any(|m| m.name() == node.name());
        if !queued && self.warned.insert(node.name().to_string()) {
            self.warnings.push(miette::Report::new(Warning {
                message: format!(
                    "type `{}` is referenced but not declared in the output",
                    node.name()
                ),
                help: Some("include it in the converted types to emit its declaration".to_string()),
            }));
        }
        Ok(node.simple_name().to_string())
    }

    fn create_enum_type(&self, enm: &ProtoEnum) -> String {
        let mut out = self.comments.format(enm.comment.as_deref(), false);
        write!(out, "export enum {}", enm.simple_name()).expect("write to String is infallible");
        if enm.values.is_empty() {
            out.push_str(" {}");
            return out;
        }
        out.push_str(" {\n");
        for symbol in enm.values.keys() {
            let comment = self
                .comments
                .format(enm.comments.get(symbol).map(String::as_str), true);
            writeln!(out, "  {comment}{symbol} = \"{symbol}\",").expect("write to String is infallible");
        }
        out.push('}');
        out
    }

    pub fn registry(&self) -> &TypeRegistry<String> {
        &self.registry
    }

    /// The declarations so far, in registration order, separated by blank
    /// lines.
    pub fn create_source(&self) -> String {
        let declarations: Vec<&str> = self.registry.values().map(String::as_str).collect();
        if declarations.is_empty() {
            return String::new();
        }
        let mut source = declarations.join("\n\n");
        source.push('\n');
        source
    }

    pub fn into_output(self) -> TypeScriptOutput {
        TypeScriptOutput {
            source: self.create_source(),
            warnings: self.warnings,
        }
    }
}

/// Convert `messages` into TypeScript declaration source.
pub fn typescript_source(
    root: &ProtoRoot,
    messages: &[ProtoNode],
    scalars: ScalarMapping,
) -> Result<TypeScriptOutput, ConvertError> {
    let mut builder = TypeScriptDeclarationBuilder::new(root, messages).with_scalars(scalars);
    builder.build()?;
    Ok(builder.into_output())
}
