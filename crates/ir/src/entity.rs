//! Entity definitions for tables
//!
//! An `Entity` is the in-memory model of one table: an ordered list of
//! fields plus the optional table option. Join entities synthesized for
//! many-to-many relationships carry `join = true`.

use crate::field::{Field, ForeignKey};
use autotable_core::{EngineError, EngineResult, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Entity
// ============================================================================

/// Represents a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Catalog key, used as the table name
    pub name: String,

    /// Columns in declaration order
    pub fields: Vec<Field>,

    /// Table option appended to CREATE TABLE, e.g. "ENGINE=InnoDB"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,

    /// Set on synthesized many-to-many join entities
    #[serde(default)]
    pub join: bool,
}

impl Entity {
    /// Create an entity with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            option: None,
            join: false,
        }
    }

    /// Create a join entity
    pub fn join_table(name: impl Into<String>) -> Self {
        Self {
            join: true,
            ..Self::new(name)
        }
    }

    /// Set the table option
    pub fn with_option(mut self, option: Option<String>) -> Self {
        self.option = option;
        self
    }

    /// Append a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    // ========================================================================
    // Field operations
    // ========================================================================

    /// Append a field
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Check whether a column with this name is already declared
    pub fn has_column(&self, column: &str) -> bool {
        self.fields.iter().any(|f| f.column == column)
    }

    /// Get a field by column name
    pub fn get_field(&self, column: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.column == column)
    }

    /// Column names in declaration order
    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column.as_str()).collect()
    }

    /// Primary-key fields in declaration order
    pub fn primary_keys(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.primary_key).collect()
    }

    /// Foreign-key references as (column, reference) pairs in field order
    pub fn foreign_keys(&self) -> Vec<(&str, &ForeignKey)> {
        self.fields
            .iter()
            .filter_map(|f| f.foreign_key.as_ref().map(|fk| (f.column.as_str(), fk)))
            .collect()
    }

    /// The field literally named `id` (any case)
    pub fn id_field(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(crate::ID_CANDIDATE))
    }

    /// Number of columns
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Validatable for Entity {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::entity_validation(
                &self.name,
                "Entity name cannot be empty",
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.column.is_empty() {
                return Err(EngineError::entity_validation(
                    &self.name,
                    format!("Field '{}' has an empty column name", field.name),
                ));
            }
            if !seen.insert(field.column.as_str()) {
                return Err(EngineError::entity_validation(
                    &self.name,
                    format!("Duplicate column '{}'", field.column),
                ));
            }
            if let Some(fk) = &field.foreign_key {
                if fk.table.is_empty() || fk.column.is_empty() {
                    return Err(EngineError::entity_validation(
                        &self.name,
                        format!("Foreign key on '{}' has no target", field.column),
                    ));
                }
            }
        }

        if self.join && self.primary_keys().len() != 2 {
            return Err(EngineError::entity_validation(
                &self.name,
                "Join table must have a two-column primary key",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
