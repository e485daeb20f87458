//! Declared field types as reported by the descriptor source.

use crate::catalog::ScalarType;

/// Primitive value types that can never hold null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// `bool`.
    Bool,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
}

impl Primitive {
    /// The stored scalar type for this primitive.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Primitive::Bool => ScalarType::Bool,
            Primitive::I8 => ScalarType::Int8,
            Primitive::I16 => ScalarType::Int16,
            Primitive::I32 => ScalarType::Int32,
            Primitive::I64 => ScalarType::Int64,
            Primitive::F32 => ScalarType::Float32,
            Primitive::F64 => ScalarType::Float64,
        }
    }
}

/// The type a field is declared with in code.
///
/// The element type of a [`DeclaredType::List`] is not part of the
/// declaration; list fields name their linked entity through
/// `FieldDescriptor::link` instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    /// A primitive without nullability, e.g. `i64`.
    Primitive(Primitive),
    /// A nullable primitive, e.g. `Option<i64>`.
    Nullable(Primitive),
    /// UTF-8 text.
    Text,
    /// Date and time.
    Timestamp,
    /// Raw byte sequence.
    Bytes,
    /// Direct reference to another entity type.
    Entity(String),
    /// Ordered list of references.
    List,
    /// Derived backlink results pointing back from the named entity.
    Backlinks(String),
    /// Any other type the descriptor source could not map.
    Other(String),
}

impl std::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclaredType::Primitive(p) => write!(f, "{}", p.scalar_type()),
            DeclaredType::Nullable(p) => write!(f, "{}?", p.scalar_type()),
            DeclaredType::Text => f.write_str("text"),
            DeclaredType::Timestamp => f.write_str("timestamp"),
            DeclaredType::Bytes => f.write_str("bytes"),
            DeclaredType::Entity(name) => write!(f, "{name}"),
            DeclaredType::List => f.write_str("list"),
            DeclaredType::Backlinks(name) => write!(f, "backlinks<{name}>"),
            DeclaredType::Other(name) => write!(f, "{name}"),
        }
    }
}
