//! Field definitions for entity columns
//!
//! This module contains the `Field` struct (one column, pre-render), the
//! `ForeignKey` reference and the per-field outcome types returned by the
//! schema builder.

use crate::tag::TagOptions;
use autotable_core::{ColumnTypeMapper, TypeRef};
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ForeignKey
// ============================================================================

/// Reference from a column to another entity's primary-key column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Catalog key of the referenced entity
    pub table: String,
    /// Referenced column
    pub column: String,
}

impl ForeignKey {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

// ============================================================================
// Field
// ============================================================================

/// One column of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as declared (or synthesized for foreign keys)
    pub name: String,

    /// Column name in the table
    pub column: String,

    /// Semantic type of the field
    pub semantic_type: TypeRef,

    /// Resolved dialect column type, e.g. `VARCHAR(255)`
    pub column_type: String,

    /// Explicit `type` tag, kept so foreign keys can inherit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_type: Option<String>,

    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    pub primary_key: bool,

    pub auto_increment: bool,

    /// Index names this column belongs to; empty names are generated at render time
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<String>,

    /// Unique index names this column belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uniques: Vec<String>,

    /// Free-text clause appended to the column definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

impl Field {
    /// Build a field from its declared name, type and tag options.
    ///
    /// Primary-key inference and relationships are applied by the schema
    /// builder on top of the returned field.
    pub fn build<M: ColumnTypeMapper + ?Sized>(
        name: &str,
        semantic_type: TypeRef,
        options: &TagOptions,
        comment: Option<&str>,
        mapper: &M,
    ) -> Self {
        let column = options
            .column
            .clone()
            .unwrap_or_else(|| name.to_snake_case());

        let bare = semantic_type.deref_pointers().to_string();
        let nullable = options.nullable || semantic_type.is_pointer() || mapper.is_nullable(&bare);
        let column_type = mapper.column_type(options.column_type.as_deref().unwrap_or(&bare));

        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Self {
            name: name.to_string(),
            column,
            semantic_type,
            column_type,
            explicit_type: options.column_type.clone(),
            nullable,
            default: options.default.clone(),
            primary_key: options.primary_key,
            auto_increment: options.auto_increment,
            indexes: options.indexes.clone(),
            uniques: options.uniques.clone(),
            extra: options.extra.clone(),
            comment,
            foreign_key: None,
        }
    }

    /// Attach a foreign-key reference
    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_key = Some(foreign_key);
        self
    }

    /// Check if this field references another entity
    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key.is_some()
    }
}

/// Check the exported-name convention: the first character is upper case
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

// ============================================================================
// Outcomes and warnings
// ============================================================================

/// Result of processing one field descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// The field became a column of the current entity
    Column(Field),
    /// Embedded field; contributes nothing
    Embedded,
    /// The field synthesized the named join entity
    JoinTable(String),
    /// The field was dropped
    Warning(FieldWarning),
}

/// Why a field was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningReason {
    #[error("ignored by tag")]
    Ignored,

    #[error("not exported")]
    Unexported,

    #[error("entity '{0}' has no id field")]
    MissingPrimaryKey(String),

    #[error("join table '{0}' already exists")]
    DuplicateJoinTable(String),

    #[error("column '{0}' already declared")]
    DuplicateColumn(String),
}

/// A dropped field, with the entity and field it came from
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity}.{field}: {reason}")]
pub struct FieldWarning {
    pub entity: String,
    pub field: String,
    pub reason: WarningReason,
}

impl FieldWarning {
    pub fn new(entity: impl Into<String>, field: impl Into<String>, reason: WarningReason) -> Self {
        Self {
            entity: entity.into(),
            field: field.into(),
            reason,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
