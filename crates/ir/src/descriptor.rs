//! Record descriptors delivered by the upstream type parser
//!
//! A `RecordDescriptor` is the structured form of one annotated record
//! (struct-like type) of the host source. Producing it is the job of an
//! external parser; this crate only consumes it.

use autotable_core::{EngineError, EngineResult, TypeRef, Validatable};
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

// ============================================================================
// RecordDescriptor
// ============================================================================

/// One annotated record: becomes one entity (table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    /// Record (type) name, e.g. "BlogPost"
    pub name: String,

    /// Explicit table name; defaults to the snake_cased record name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Table-level option appended to CREATE TABLE (e.g. "ENGINE=InnoDB")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,

    /// Field descriptors in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Create a descriptor with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            option: None,
            fields: Vec::new(),
        }
    }

    /// Set the table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the table option
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = Some(option.into());
        self
    }

    /// Append a field descriptor
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Key of this record in the catalog (its table name)
    pub fn table_name(&self) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| self.name.to_snake_case())
    }

    /// Find the field literally named `id` (any case)
    pub fn id_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.is_id_candidate())
    }
}

impl Validatable for RecordDescriptor {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::record_validation(
                &self.name,
                "Record name cannot be empty",
            ));
        }
        if self.table_name().is_empty() {
            return Err(EngineError::record_validation(
                &self.name,
                "Table name cannot be empty",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// FieldDescriptor
// ============================================================================

/// One field of a record as written in the host source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name; `None` for an embedded (anonymous) field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Semantic type, including pointer/array shape
    #[serde(rename = "type")]
    pub type_ref: TypeRef,

    /// Raw struct tag, e.g. `autoTable:"column:display_name,null" json:"name"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Trailing comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FieldDescriptor {
    /// Create a named field
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: Some(name.into()),
            type_ref,
            tag: None,
            comment: None,
        }
    }

    /// Create an embedded (anonymous) field
    pub fn embedded(type_ref: TypeRef) -> Self {
        Self {
            name: None,
            type_ref,
            tag: None,
            comment: None,
        }
    }

    /// Set the raw tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the trailing comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Check if this is an embedded field
    pub fn is_embedded(&self) -> bool {
        self.name.is_none()
    }

    /// Check if the field is named `id` (any case)
    pub fn is_id_candidate(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(crate::ID_CANDIDATE))
    }
}

// ============================================================================
// Tests
// ============================================================================
