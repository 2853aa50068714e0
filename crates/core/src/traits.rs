//! Core traits for auto-table
//!
//! This module defines the traits shared between the IR and the SQL
//! renderer: validation of model objects and the column type mapping the IR
//! needs from a dialect while building fields.

use crate::error::EngineResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use autotable_core::{EngineError, EngineResult, Validatable};
///
/// struct Table {
///     name: String,
/// }
///
/// impl Validatable for Table {
///     fn validate(&self) -> EngineResult<()> {
///         if self.name.is_empty() {
///             return Err(EngineError::entity_validation("", "Name cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `EngineError` describing the problem.
    fn validate(&self) -> EngineResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ============================================================================
// ColumnTypeMapper Trait
// ============================================================================

/// Maps semantic field types to the column types of one database family.
///
/// The IR builder only sees this half of a dialect; rendering statements is
/// left to the full `Dialect` trait in the codegen crate.
pub trait ColumnTypeMapper {
    /// Canonical column type for a semantic type (e.g. `string` → `VARCHAR(255)`).
    ///
    /// Types the table does not know pass through, upper-cased and with
    /// default sizing applied, so explicit `type` tags go through here too.
    fn column_type(&self, semantic_type: &str) -> String;

    /// Whether the semantic type is nullable without a pointer wrapper
    /// (e.g. `sql.NullString`).
    fn is_nullable(&self, semantic_type: &str) -> bool;
}

// ============================================================================
// Tests
// ============================================================================
