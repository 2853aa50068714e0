//! Core type definitions for auto-table
//!
//! This module contains the semantic type descriptor shared by every layer
//! (`TypeRef`) and the database selector (`DatabaseType`).

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic type names that are treated as integers (auto-increment candidates)
pub const INTEGER_KINDS: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
];

// ============================================================================
// TypeRef
// ============================================================================

/// Semantic type of a field, as written in the host type description.
///
/// Parsed from and rendered to the host syntax:
///
/// | text          | value                                        |
/// |---------------|----------------------------------------------|
/// | `int`         | `Named("int")`                               |
/// | `time.Time`   | `Qualified("time", "Time")`                  |
/// | `*string`     | `Pointer(Named("string"))`                   |
/// | `[]Tag`       | `Array(Named("Tag"))`                        |
/// | `[]*sql.Null` | `Array(Pointer(Qualified("sql", "Null")))`   |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// A plain identifier
    Named(String),
    /// A namespaced identifier (`package.Name`)
    Qualified(String, String),
    /// A pointer / optional wrapper
    Pointer(Box<TypeRef>),
    /// A slice / repeated wrapper
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Create a named type
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wrap a type in a pointer
    pub fn pointer(inner: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(inner))
    }

    /// Wrap a type in an array
    pub fn array(inner: TypeRef) -> Self {
        TypeRef::Array(Box::new(inner))
    }

    /// Check if the outermost shape is a pointer
    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeRef::Pointer(_))
    }

    /// Check if the type is an array once leading pointers are removed
    pub fn is_array(&self) -> bool {
        matches!(self.deref_pointers(), TypeRef::Array(_))
    }

    /// Strip leading pointer wrappers (`**T` → `T`, `*[]T` → `[]T`)
    pub fn deref_pointers(&self) -> &TypeRef {
        match self {
            TypeRef::Pointer(inner) => inner.deref_pointers(),
            other => other,
        }
    }

    /// The innermost named or qualified type, with every wrapper removed
    pub fn base(&self) -> &TypeRef {
        match self {
            TypeRef::Pointer(inner) | TypeRef::Array(inner) => inner.base(),
            other => other,
        }
    }

    /// Name of the base type when it is a plain identifier.
    ///
    /// Qualified types never name a record of the schema, so they yield `None`.
    pub fn base_name(&self) -> Option<&str> {
        match self.base() {
            TypeRef::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Check if this type is one of the recognised integer kinds.
    ///
    /// Only the bare type counts: `*int` and `[]int` are not integer kinds.
    pub fn is_integer_kind(&self) -> bool {
        match self {
            TypeRef::Named(name) => INTEGER_KINDS.contains(&name.as_str()),
            _ => false,
        }
    }

    fn parse(text: &str) -> EngineResult<Self> {
        let text = text.trim();
        let invalid = || EngineError::InvalidType(text.to_string());

        if let Some(rest) = text.strip_prefix('*') {
            return Ok(TypeRef::pointer(Self::parse(rest).map_err(|_| invalid())?));
        }
        if let Some(rest) = text.strip_prefix('[') {
            // `[]T` and fixed-size `[N]T` both describe repeated values
            let (len, elem) = rest.split_once(']').ok_or_else(invalid)?;
            if !len.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            return Ok(TypeRef::array(Self::parse(elem).map_err(|_| invalid())?));
        }
        if let Some((qualifier, name)) = text.split_once('.') {
            if is_identifier(qualifier) && is_identifier(name) {
                return Ok(TypeRef::Qualified(qualifier.to_string(), name.to_string()));
            }
            return Err(invalid());
        }
        if is_identifier(text) {
            Ok(TypeRef::Named(text.to_string()))
        } else {
            Err(invalid())
        }
    }
}

impl FromStr for TypeRef {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::Qualified(qualifier, name) => write!(f, "{}.{}", qualifier, name),
            TypeRef::Pointer(inner) => write!(f, "*{}", inner),
            TypeRef::Array(inner) => write!(f, "[]{}", inner),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ============================================================================
// DatabaseType
// ============================================================================

/// Database family targeted by the SQL renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// MySQL and MariaDB
    #[default]
    #[serde(alias = "mariadb")]
    MySQL,
}

impl DatabaseType {
    /// All supported database types
    pub fn all() -> &'static [DatabaseType] {
        &[DatabaseType::MySQL]
    }

    /// Short identifier used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::MySQL => "mysql",
        }
    }
}

impl FromStr for DatabaseType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseType::MySQL),
            other => Err(EngineError::InvalidConfig(format!(
                "unsupported database '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::MySQL => write!(f, "MySQL"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_named() {
        let ty: TypeRef = "int".parse().unwrap();
        assert_eq!(ty, TypeRef::named("int"));
        assert!(ty.is_integer_kind());
        assert!(!ty.is_pointer());
        assert!(!ty.is_array());
    }

    #[test]
    fn test_parse_nested_shapes() {
        let ty: TypeRef = "[]*sql.NullString".parse().unwrap();
        assert_eq!(
            ty,
            TypeRef::array(TypeRef::pointer(TypeRef::Qualified(
                "sql".to_string(),
                "NullString".to_string()
            )))
        );
        assert!(ty.is_array());
        assert_eq!(ty.base_name(), None);
        assert_eq!(ty.to_string(), "[]*sql.NullString");
    }

    #[test]
    fn test_pointer_to_array_is_array() {
        let ty: TypeRef = "*[]Tag".parse().unwrap();
        assert!(ty.is_pointer());
        assert!(ty.is_array());
        assert_eq!(ty.base_name(), Some("Tag"));
        assert_eq!(ty.deref_pointers().to_string(), "[]Tag");
    }

    #[test]
    fn test_fixed_size_array() {
        let ty: TypeRef = "[16]byte".parse().unwrap();
        assert_eq!(ty, TypeRef::array(TypeRef::named("byte")));
        assert_eq!(ty.to_string(), "[]byte");
    }

    #[test]
    fn test_pointer_integer_is_not_integer_kind() {
        let ty: TypeRef = "*int64".parse().unwrap();
        assert!(!ty.is_integer_kind());
        assert!(ty.deref_pointers().is_integer_kind());
    }

    #[test]
    fn test_invalid_types() {
        for text in ["", "*", "[]", "[x]int", "map[string]int", "a.b.c", "9lives"] {
            let err = text.parse::<TypeRef>().unwrap_err();
            assert!(err.is_annotation(), "expected annotation error for {:?}", text);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let ty: TypeRef = serde_json::from_str("\"*time.Time\"").unwrap();
        assert_eq!(ty.deref_pointers().to_string(), "time.Time");
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"*time.Time\"");
        assert!(serde_json::from_str::<TypeRef>("\"[x]int\"").is_err());
    }

    #[test]
    fn test_database_type() {
        assert_eq!("mysql".parse::<DatabaseType>().unwrap(), DatabaseType::MySQL);
        assert_eq!("MariaDB".parse::<DatabaseType>().unwrap(), DatabaseType::MySQL);
        assert!("oracle".parse::<DatabaseType>().is_err());
        assert_eq!(DatabaseType::default().as_str(), "mysql");
        assert_eq!(DatabaseType::MySQL.to_string(), "MySQL");
        assert_eq!(DatabaseType::all().len(), 1);
    }
}
