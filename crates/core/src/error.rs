//! Error types for auto-table
//!
//! This module provides unified error handling across the workspace:
//! annotation errors, structural errors found while building the schema,
//! migration ordering errors, IO errors and serialization errors.
//!
//! Non-fatal problems with individual fields are not errors; they are
//! reported as warnings by the IR builder.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for auto-table
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Annotation Errors
    // ========================================================================
    /// A tag option that is not recognised
    #[error("Unknown tag option: `{0}`")]
    UnknownTagOption(String),

    /// A tag option that needs a parameter was given without one
    #[error("`{0}` tag must specify the parameter")]
    MissingTagParameter(String),

    /// The raw tag string does not follow the `key:"value"` convention
    #[error("Malformed tag `{tag}`: {message}")]
    MalformedTag { tag: String, message: String },

    /// A type expression that cannot be parsed
    #[error("Invalid type expression `{0}`")]
    InvalidType(String),

    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// More than one field of an entity qualifies as its ID
    #[error("Multiple IDs exist in entity '{0}'")]
    MultipleIds(String),

    /// Entity validation failed
    #[error("Entity validation failed for '{entity}': {message}")]
    EntityValidation { entity: String, message: String },

    /// Record descriptor validation failed
    #[error("Record validation failed for '{record}': {message}")]
    RecordValidation { record: String, message: String },

    /// Duplicate entity name
    #[error("Duplicate entity name: '{0}' already exists")]
    DuplicateEntity(String),

    /// Entity not found
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    // ========================================================================
    // Ordering Errors
    // ========================================================================
    /// No entity could be emitted in a full pass over the dependency map
    #[error("Circular dependency detected among: {}", .0.join(", "))]
    CircularDependency(Vec<String>),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    /// Output file already exists and overwriting is disabled
    #[error("Output file already exists: {0}")]
    OutputExists(PathBuf),

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML deserialization error: {0}")]
    TomlDeserialization(#[from] toml::de::Error),

    /// Input file could not be decoded into record descriptors
    #[error("Invalid input file '{path}': {message}")]
    InvalidInput { path: PathBuf, message: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EngineError {
    /// Create a malformed tag error
    pub fn malformed_tag(tag: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::MalformedTag {
            tag: tag.into(),
            message: msg.into(),
        }
    }

    /// Create an entity validation error
    pub fn entity_validation(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::EntityValidation {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create a record validation error
    pub fn record_validation(record: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::RecordValidation {
            record: record.into(),
            message: msg.into(),
        }
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error comes from a malformed annotation
    pub fn is_annotation(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownTagOption(_)
                | EngineError::MissingTagParameter(_)
                | EngineError::MalformedTag { .. }
                | EngineError::InvalidType(_)
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::EntityNotFound(_))
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_)
                | EngineError::FileRead { .. }
                | EngineError::FileWrite { .. }
                | EngineError::DirectoryCreate { .. }
                | EngineError::OutputExists(_)
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T>;
}

impl<T, E: Into<EngineError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T> {
        self.map_err(|e| {
            let err: EngineError = e.into();
            EngineError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_option() {
        let err = EngineError::UnknownTagOption("size:10".to_string());
        assert!(err.is_annotation());
        assert!(!err.is_io());
        assert_eq!(err.to_string(), "Unknown tag option: `size:10`");
    }

    #[test]
    fn test_missing_tag_parameter() {
        let err = EngineError::MissingTagParameter("column".to_string());
        assert!(err.is_annotation());
        assert_eq!(err.to_string(), "`column` tag must specify the parameter");
    }

    #[test]
    fn test_malformed_tag() {
        let err = EngineError::malformed_tag("autoTable:\"pk", "unterminated quoted value");
        assert!(err.is_annotation());
        assert_eq!(
            err.to_string(),
            "Malformed tag `autoTable:\"pk`: unterminated quoted value"
        );
    }

    #[test]
    fn test_circular_dependency() {
        let err = EngineError::CircularDependency(vec!["a".to_string(), "b".to_string()]);
        assert!(!err.is_annotation());
        assert_eq!(err.to_string(), "Circular dependency detected among: a, b");
    }

    #[test]
    fn test_multiple_ids() {
        let err = EngineError::MultipleIds("user".to_string());
        assert_eq!(err.to_string(), "Multiple IDs exist in entity 'user'");
    }

    #[test]
    fn test_not_found_errors() {
        let err = EngineError::EntityNotFound("user".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: user");
    }

    #[test]
    fn test_error_with_context() {
        let err = EngineError::with_context("post.Author", "Unknown tag option: `x`");
        assert_eq!(err.to_string(), "post.Author: Unknown tag option: `x`");
    }

    #[test]
    fn test_result_ext_wraps_message() {
        let result: Result<(), EngineError> =
            Err(EngineError::MissingTagParameter("type".to_string()));
        let err = result.with_context("user.Name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "user.Name: `type` tag must specify the parameter"
        );
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EngineError = io_err.into();
        assert!(err.is_io());

        let err = EngineError::OutputExists(PathBuf::from("out/1_add_user_table.up.sql"));
        assert!(err.is_io());
    }
}
