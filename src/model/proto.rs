use indexmap::IndexMap;

use crate::scalar::ScalarKind;

/// What a field's values are: a proto scalar or a reference to a named
/// message/enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarKind),
    /// Qualified name of a message or enum.
    Named(String),
}

impl FieldType {
    /// Classify a proto type name: scalar kinds by keyword, anything else is a
    /// named reference.
    pub fn parse(name: &str) -> Self {
        match ScalarKind::from_name(name) {
            Some(kind) => FieldType::Scalar(kind),
            None => FieldType::Named(name.to_string()),
        }
    }

    /// The simple (last-segment) name of the referenced type, or the scalar
    /// keyword.
    pub fn simple_name(&self) -> &str {
        match self {
            FieldType::Scalar(kind) => kind.as_str(),
            FieldType::Named(name) => simple_name(name),
        }
    }
}

/// A message field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoField {
    pub name: String,
    /// For map fields, the value type.
    pub field_type: FieldType,
    pub repeated: bool,
    /// True when the field does not track presence.
    pub required: bool,
    /// Name of the oneof group this field belongs to, if any.
    pub oneof: Option<String>,
    /// Key kind for map fields.
    pub map_key: Option<ScalarKind>,
    pub comment: Option<String>,
}

impl ProtoField {
    /// A singular field with no presence tracking.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        ProtoField {
            name: name.into(),
            field_type,
            repeated: false,
            required: true,
            oneof: None,
            map_key: None,
            comment: None,
        }
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub fn in_oneof(mut self, group: impl Into<String>) -> Self {
        self.oneof = Some(group.into());
        self.required = false;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.field_type, FieldType::Scalar(_))
    }

    pub fn is_map(&self) -> bool {
        self.map_key.is_some()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// A oneof group: at most one of its member fields is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoOneOf {
    pub name: String,
    /// Member field names, in declaration order.
    pub fields: Vec<String>,
    pub comment: Option<String>,
}

/// A protobuf message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoMessage {
    /// Fully-qualified name, without a leading dot.
    pub name: String,
    pub fields: Vec<ProtoField>,
    pub oneofs: Vec<ProtoOneOf>,
    /// Converted to a GraphQL input object rather than an output object.
    pub is_input: bool,
    pub comment: Option<String>,
}

impl ProtoMessage {
    pub fn new(name: impl Into<String>) -> Self {
        ProtoMessage {
            name: name.into(),
            fields: Vec::new(),
            oneofs: Vec::new(),
            is_input: false,
            comment: None,
        }
    }

    /// Append a field. Fields naming a oneof group are added to that group,
    /// which is created on first use.
    #[must_use]
    pub fn field(mut self, field: ProtoField) -> Self {
        if let Some(group) = &field.oneof {
            match self.oneofs.iter_mut().find(|o| &o.name == group) {
                Some(oneof) => oneof.fields.push(field.name.clone()),
                None => self.oneofs.push(ProtoOneOf {
                    name: group.clone(),
                    fields: vec![field.name.clone()],
                    comment: None,
                }),
            }
        }
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn input(mut self) -> Self {
        self.is_input = true;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn oneof(&self, name: &str) -> Option<&ProtoOneOf> {
        self.oneofs.iter().find(|o| o.name == name)
    }

    pub fn find_field(&self, name: &str) -> Option<&ProtoField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A protobuf enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoEnum {
    pub name: String,
    /// Symbol → number, in declaration order.
    pub values: IndexMap<String, i32>,
    /// Per-symbol comments.
    pub comments: IndexMap<String, String>,
    pub comment: Option<String>,
}

impl ProtoEnum {
    pub fn new(name: impl Into<String>) -> Self {
        ProtoEnum {
            name: name.into(),
            values: IndexMap::new(),
            comments: IndexMap::new(),
            comment: None,
        }
    }

    #[must_use]
    pub fn value(mut self, symbol: impl Into<String>, number: i32) -> Self {
        self.values.insert(symbol.into(), number);
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}

/// A type node of the reflection graph, classified once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtoNode {
    Message(ProtoMessage),
    Enum(ProtoEnum),
}

impl ProtoNode {
    /// Fully-qualified name.
    pub fn name(&self) -> &str {
        match self {
            ProtoNode::Message(m) => &m.name,
            ProtoNode::Enum(e) => &e.name,
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name(self.name())
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, ProtoNode::Enum(_))
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            ProtoNode::Message(m) => m.comment.as_deref(),
            ProtoNode::Enum(e) => e.comment.as_deref(),
        }
    }
}

impl From<ProtoMessage> for ProtoNode {
    fn from(message: ProtoMessage) -> Self {
        ProtoNode::Message(message)
    }
}

impl From<ProtoEnum> for ProtoNode {
    fn from(enm: ProtoEnum) -> Self {
        ProtoNode::Enum(enm)
    }
}

/// The last dot-separated segment of a qualified name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// The enclosing scope of a qualified name (`"a.b.C"` → `"a.b"`), or `""`.
pub fn parent_scope(qualified: &str) -> &str {
    qualified.rsplit_once('.').map_or("", |(scope, _)| scope)
}

/// Every type of a loaded schema, indexed by qualified name in declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoRoot {
    types: IndexMap<String, ProtoNode>,
}

impl ProtoRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Fails if the qualified name is already taken.
    pub fn insert(&mut self, node: impl Into<ProtoNode>) -> Result<(), String> {
        let node = node.into();
        let name = node.name().to_string();
        if self.types.contains_key(&name) {
            return Err(format!("duplicate type name: {name}"));
        }
        self.types.insert(name, node);
        Ok(())
    }

    /// Look up a node by qualified name. A leading dot is accepted.
    pub fn lookup(&self, name: &str) -> Option<&ProtoNode> {
        self.types.get(name.trim_start_matches('.'))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut ProtoNode> {
        self.types.get_mut(name.trim_start_matches('.'))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All nodes, in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &ProtoNode> {
        self.types.values()
    }

    /// All qualified names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Find the node a type reference points at: the supplied list is scanned
/// first (qualified name, then simple name), then the root lookup.
pub fn lookup_node<'a>(
    messages: &'a [ProtoNode],
    root: &'a ProtoRoot,
    name: &str,
) -> Option<&'a ProtoNode> {
    let name = name.trim_start_matches('.');
    messages
        .iter()
        .find(|m| m.name() == name)
        .or_else(|| root.lookup(name))
        .or_else(|| messages.iter().find(|m| m.simple_name() == name))
}
