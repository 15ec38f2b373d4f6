// ==============================================================================
// Scalar Mapping: Proto Scalar Kinds to Target Primitives
// ==============================================================================
//
// 64-bit integers map to a textual type by default, since JavaScript numbers
// lose precision past 2^53. The table is a plain value handed to each builder
// so a pass can be configured without touching call sites.

use std::fmt;

/// The protobuf scalar value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarKind {
    /// Parse the proto type name of a scalar (`"int64"`, `"bytes"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "double" => ScalarKind::Double,
            "float" => ScalarKind::Float,
            "int32" => ScalarKind::Int32,
            "int64" => ScalarKind::Int64,
            "uint32" => ScalarKind::Uint32,
            "uint64" => ScalarKind::Uint64,
            "sint32" => ScalarKind::Sint32,
            "sint64" => ScalarKind::Sint64,
            "fixed32" => ScalarKind::Fixed32,
            "fixed64" => ScalarKind::Fixed64,
            "sfixed32" => ScalarKind::Sfixed32,
            "sfixed64" => ScalarKind::Sfixed64,
            "bool" => ScalarKind::Bool,
            "string" => ScalarKind::String,
            "bytes" => ScalarKind::Bytes,
            _ => return None,
        })
    }

    /// The proto type name of this scalar.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Sint64 => "sint64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Sfixed64 => "sfixed64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
        }
    }

    pub fn is_64_bit_integer(&self) -> bool {
        matches!(
            self,
            ScalarKind::Int64
                | ScalarKind::Uint64
                | ScalarKind::Sint64
                | ScalarKind::Fixed64
                | ScalarKind::Sfixed64
        )
    }

    /// Whether this kind may be used as a map key.
    pub fn is_valid_map_key(&self) -> bool {
        !matches!(
            self,
            ScalarKind::Double | ScalarKind::Float | ScalarKind::Bytes
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How 64-bit integer kinds are represented in the targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Int64Representation {
    /// `String` in GraphQL, `string` in TypeScript.
    #[default]
    String,
    /// `Float` in GraphQL (Int is 32-bit there), `number` in TypeScript.
    Number,
}

/// The built-in GraphQL scalars a proto scalar can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphqlScalar {
    Int,
    Float,
    String,
    Boolean,
}

impl GraphqlScalar {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphqlScalar::Int => "Int",
            GraphqlScalar::Float => "Float",
            GraphqlScalar::String => "String",
            GraphqlScalar::Boolean => "Boolean",
        }
    }
}

/// The TypeScript primitives a proto scalar can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    Number,
    String,
    Boolean,
}

impl TsPrimitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            TsPrimitive::Number => "number",
            TsPrimitive::String => "string",
            TsPrimitive::Boolean => "boolean",
        }
    }
}

/// Immutable proto scalar → target primitive table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScalarMapping {
    int64: Int64Representation,
}

impl ScalarMapping {
    pub fn new(int64: Int64Representation) -> Self {
        ScalarMapping { int64 }
    }

    pub fn int64_representation(&self) -> Int64Representation {
        self.int64
    }

    pub fn graphql(&self, kind: ScalarKind) -> GraphqlScalar {
        if kind.is_64_bit_integer() {
            return match self.int64 {
                Int64Representation::String => GraphqlScalar::String,
                Int64Representation::Number => GraphqlScalar::Float,
            };
        }
        match kind {
            ScalarKind::Double | ScalarKind::Float => GraphqlScalar::Float,
            ScalarKind::Bool => GraphqlScalar::Boolean,
            ScalarKind::String | ScalarKind::Bytes => GraphqlScalar::String,
            _ => GraphqlScalar::Int,
        }
    }

    pub fn typescript(&self, kind: ScalarKind) -> TsPrimitive {
        if kind.is_64_bit_integer() {
            return match self.int64 {
                Int64Representation::String => TsPrimitive::String,
                Int64Representation::Number => TsPrimitive::Number,
            };
        }
        match kind {
            ScalarKind::Bool => TsPrimitive::Boolean,
            ScalarKind::String | ScalarKind::Bytes => TsPrimitive::String,
            _ => TsPrimitive::Number,
        }
    }
}
