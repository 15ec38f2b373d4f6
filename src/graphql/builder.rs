// ==============================================================================
// GraphQL Schema Builder
// ==============================================================================
//
// Walks the supplied message/enum list and produces one GraphQL named type for
// every type transitively reachable from it.
//
// Cycle handling: resolving a message registers its object type with
// `Fields::Deferred` and queues the message; nothing below it is walked yet.
// Fields are built the first time they are read (`fields`) or when the schema
// is materialized for printing (`get_schemas`). By then every type that can
// refer back to the message already finds it in the registry, so
// `message Node { Node next = 1; }` and `A → B → A` terminate.
//
// Oneof groups collapse into a single field typed as a union registered under
// the oneof's qualified name. Map fields resolve to a synthesized entry
// message, registered like any declared message.
//
// Two qualified names may sanitize to one GraphQL name (`Outer.Inner` and
// `Outer_Inner`). Registration rejects the second one instead of printing the
// type twice.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::sdl::print_type;
use super::types::{
    EnumType, EnumValueDef, FieldDef, Fields, NamedType, ObjectType, TypeRef, UnionType,
};
use crate::error::ConvertError;
use crate::map_field::synthesize_map_message;
use crate::model::proto::{
    FieldType, ProtoEnum, ProtoField, ProtoMessage, ProtoNode, ProtoRoot, lookup_node,
};
use crate::registry::TypeRegistry;
use crate::scalar::ScalarMapping;
use crate::suggest::suggest_similar_name;

static INVALID_NAME_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^_0-9A-Za-z]").expect("literal pattern compiles"));

/// Map a qualified proto name to a valid GraphQL name: dots become
/// underscores, as does anything outside `[_0-9A-Za-z]`.
pub fn graphql_name(qualified: &str) -> String {
    let name = INVALID_NAME_CHAR
        .replace_all(qualified.trim_start_matches('.'), "_")
        .into_owned();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Converts a protobuf reflection graph into GraphQL named types.
///
/// One builder runs one pass: its registry lives as long as the builder.
pub struct GraphqlSchemaBuilder<'a> {
    root: &'a ProtoRoot,
    messages: &'a [ProtoNode],
    scalars: ScalarMapping,
    registry: TypeRegistry<NamedType>,
    /// Messages registered with deferred fields, by qualified name.
    deferred: IndexMap<String, ProtoMessage>,
    /// GraphQL name → the qualified name that claimed it.
    claimed: HashMap<String, String>,
}

impl<'a> GraphqlSchemaBuilder<'a> {
    pub fn new(root: &'a ProtoRoot, messages: &'a [ProtoNode]) -> Self {
        Self::with_scalars(root, messages, ScalarMapping::default())
    }

    pub fn with_scalars(
        root: &'a ProtoRoot,
        messages: &'a [ProtoNode],
        scalars: ScalarMapping,
    ) -> Self {
        GraphqlSchemaBuilder {
            root,
            messages,
            scalars,
            registry: TypeRegistry::new(),
            deferred: IndexMap::new(),
            claimed: HashMap::new(),
        }
    }

    /// Resolve every node of the supplied list.
    pub fn build(&mut self) -> Result<(), ConvertError> {
        for node in self.messages {
            self.resolve_node(node)?;
        }
        Ok(())
    }

    /// Resolve a qualified type name to a reference to its GraphQL type,
    /// converting and registering it on first use.
    pub fn resolve(&mut self, qualified: &str) -> Result<TypeRef, ConvertError> {
        let qualified = qualified.trim_start_matches('.');
        if let Some(existing) = self.registry.get(qualified) {
            return Ok(TypeRef::named(existing.name()));
        }
        let node = lookup_node(self.messages, self.root, qualified).ok_or_else(|| {
            let known = self
                .messages
                .iter()
                .map(ProtoNode::name)
                .chain(self.root.names());
            ConvertError::TypeNotFound {
                name: qualified.to_string(),
                help: suggest_similar_name(qualified, known),
            }
        })?;
        self.resolve_node(node)
    }

    /// Resolve an already-classified node. The registry is keyed by the
    /// node's own qualified name.
    fn resolve_node(&mut self, node: &ProtoNode) -> Result<TypeRef, ConvertError> {
        if let Some(existing) = self.registry.get(node.name()) {
            return Ok(TypeRef::named(existing.name()));
        }
        match node {
            ProtoNode::Enum(enm) => self.convert_enum(enm),
            ProtoNode::Message(message) => self.convert_message(message),
        }
    }

    fn register(&mut self, qualified: &str, ty: NamedType) -> Result<TypeRef, ConvertError> {
        let name = ty.name().to_string();
        if let Some(owner) = self.claimed.get(&name) {
            if owner != qualified {
                return Err(ConvertError::malformed(format!(
                    "`{owner}` and `{qualified}` both map to GraphQL type `{name}`"
                )));
            }
        }
        self.registry
            .register(qualified, ty)
            .map_err(ConvertError::malformed)?;
        self.claimed.insert(name.clone(), qualified.to_string());
        Ok(TypeRef::named(&name))
    }

    fn convert_enum(&mut self, enm: &ProtoEnum) -> Result<TypeRef, ConvertError> {
        let values = enm
            .values
            .iter()
            .map(|(symbol, number)| EnumValueDef {
                name: symbol.clone(),
                value: *number,
                description: enm.comments.get(symbol).cloned(),
            })
            .collect();
        self.register(
            &enm.name,
            NamedType::Enum(EnumType {
                name: graphql_name(&enm.name),
                description: enm.comment.clone(),
                values,
            }),
        )
    }

    /// Register the message's type handle and defer its fields.
    fn convert_message(&mut self, message: &ProtoMessage) -> Result<TypeRef, ConvertError> {
        let object = ObjectType {
            name: graphql_name(&message.name),
            description: message.comment.clone(),
            fields: Fields::Deferred,
        };
        let ty = if message.is_input {
            NamedType::InputObject(object)
        } else {
            NamedType::Object(object)
        };
        let handle = self.register(&message.name, ty)?;
        self.deferred.insert(message.name.clone(), message.clone());
        Ok(handle)
    }

    /// The fields of a registered object type, building them on first read.
    pub fn fields(&mut self, qualified: &str) -> Result<&[FieldDef], ConvertError> {
        let qualified = qualified.trim_start_matches('.');
        self.force(qualified)?;
        self.registry
            .get(qualified)
            .and_then(NamedType::as_object)
            .and_then(ObjectType::resolved_fields)
            .ok_or_else(|| {
                ConvertError::malformed(format!("`{qualified}` is not a registered message type"))
            })
    }

    /// Build the deferred fields of `qualified`, if any.
    fn force(&mut self, qualified: &str) -> Result<(), ConvertError> {
        let Some(message) = self.deferred.shift_remove(qualified) else {
            return Ok(());
        };
        let fields = self.convert_fields(&message)?;
        if let Some(object) = self
            .registry
            .get_mut(qualified)
            .and_then(NamedType::as_object_mut)
        {
            object.fields = Fields::Resolved(fields);
        }
        Ok(())
    }

    /// Build fields until none are deferred. Building one message's fields
    /// may register and defer further messages.
    pub fn materialize(&mut self) -> Result<(), ConvertError> {
        while let Some(name) = self.deferred.keys().next().cloned() {
            self.force(&name)?;
        }
        Ok(())
    }

    fn convert_fields(&mut self, message: &ProtoMessage) -> Result<Vec<FieldDef>, ConvertError> {
        let mut fields = Vec::with_capacity(message.fields.len());
        let mut seen_groups = HashSet::new();
        for field in &message.fields {
            match &field.oneof {
                Some(group) => {
                    if !seen_groups.insert(group.as_str()) {
                        continue;
                    }
                    let description = message.oneof(group).and_then(|o| o.comment.clone());
                    fields.push(FieldDef {
                        name: group.clone(),
                        ty: self.convert_oneof(message, group)?,
                        description,
                    });
                }
                None => fields.push(FieldDef {
                    name: field.name.clone(),
                    ty: self.convert_field_type(message, field)?,
                    description: field.comment.clone(),
                }),
            }
        }
        Ok(fields)
    }

    fn convert_field_type(
        &mut self,
        message: &ProtoMessage,
        field: &ProtoField,
    ) -> Result<TypeRef, ConvertError> {
        let base = if field.is_map() {
            let entry = synthesize_map_message(message, field).ok_or_else(|| {
                ConvertError::malformed(format!("`{}.{}` is not a map", message.name, field.name))
            })?;
            // Value types are resolved when the entry's own fields are built.
            self.resolve_node(&ProtoNode::Message(entry))?
        } else {
            match &field.field_type {
                FieldType::Scalar(kind) => TypeRef::named(self.scalars.graphql(*kind).as_str()),
                FieldType::Named(name) => self.resolve(name)?,
            }
        };
        let ty = if field.repeated { base.list() } else { base };
        Ok(if field.is_required() { ty.non_null() } else { ty })
    }

    fn convert_oneof(&mut self, message: &ProtoMessage, group: &str) -> Result<TypeRef, ConvertError> {
        let qualified = format!("{}.{group}", message.name);
        if let Some(existing) = self.registry.get(&qualified) {
            return Ok(TypeRef::named(existing.name()));
        }

        // Member order follows the group's declaration; fall back to field
        // order when the group was not declared explicitly.
        let member_names: Vec<&str> = match message.oneof(group) {
            Some(oneof) => oneof.fields.iter().map(String::as_str).collect(),
            None => message
                .fields
                .iter()
                .filter(|f| f.oneof.as_deref() == Some(group))
                .map(|f| f.name.as_str())
                .collect(),
        };
        let mut members = Vec::with_capacity(member_names.len());
        for member in member_names {
            let field = message.find_field(member).ok_or_else(|| {
                ConvertError::malformed(format!(
                    "oneof `{qualified}` names unknown field `{member}`"
                ))
            })?;
            members.push(self.convert_field_type(message, field)?);
        }

        self.register(
            &qualified,
            NamedType::Union(UnionType {
                name: graphql_name(&qualified),
                description: message.oneof(group).and_then(|o| o.comment.clone()),
                members,
            }),
        )
    }

    /// The registered type for a qualified name, fields possibly deferred.
    pub fn get_type(&self, qualified: &str) -> Option<&NamedType> {
        self.registry.get(qualified.trim_start_matches('.'))
    }

    pub fn registry(&self) -> &TypeRegistry<NamedType> {
        &self.registry
    }

    /// SDL for every registered type, sorted by GraphQL name. Deferred fields
    /// are built first, which may register further types.
    pub fn get_schemas(&mut self) -> Result<Vec<String>, ConvertError> {
        self.materialize()?;
        let mut types: Vec<&NamedType> = self.registry.values().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(types.into_iter().map(print_type).collect())
    }
}

/// Convert `messages` (and everything they reach) into SDL definitions,
/// sorted by name.
pub fn graphql_schemas(
    root: &ProtoRoot,
    messages: &[ProtoNode],
    scalars: ScalarMapping,
) -> Result<Vec<String>, ConvertError> {
    let mut builder = GraphqlSchemaBuilder::with_scalars(root, messages, scalars);
    builder.build()?;
    builder.get_schemas()
}
