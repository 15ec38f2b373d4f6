use std::fmt;

/// A GraphQL type reference as it appears on a field or union member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A named type: a built-in scalar or a registered type.
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    #[must_use]
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Wrap in non-null. Already non-null references are returned unchanged.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// The innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A field of an object or input-object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
}

/// The fields of an object type. Deferred until first read so that a type
/// can be referenced (by itself, or through a cycle) before its fields exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
    Deferred,
    Resolved(Vec<FieldDef>),
}

/// An object or input-object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Fields,
}

impl ObjectType {
    /// The resolved fields, or `None` while still deferred.
    pub fn resolved_fields(&self) -> Option<&[FieldDef]> {
        match &self.fields {
            Fields::Resolved(fields) => Some(fields),
            Fields::Deferred => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDef {
    pub name: String,
    pub value: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<TypeRef>,
}

/// A GraphQL named type produced by the schema builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedType {
    Object(ObjectType),
    InputObject(ObjectType),
    Enum(EnumType),
    Union(UnionType),
}

impl NamedType {
    /// The GraphQL name of this type.
    pub fn name(&self) -> &str {
        match self {
            NamedType::Object(o) | NamedType::InputObject(o) => &o.name,
            NamedType::Enum(e) => &e.name,
            NamedType::Union(u) => &u.name,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            NamedType::Object(o) | NamedType::InputObject(o) => Some(o),
            _ => None,
        }
    }

    pub(crate) fn as_object_mut(&mut self) -> Option<&mut ObjectType> {
        match self {
            NamedType::Object(o) | NamedType::InputObject(o) => Some(o),
            _ => None,
        }
    }
}
