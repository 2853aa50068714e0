//! Relationship detection between records
//!
//! A field whose base type names another record of the schema is a
//! relationship: a single (possibly pointer) reference is one-to-many and
//! becomes a foreign-key column, an array reference is many-to-many and
//! becomes a join entity.

use crate::descriptor::RecordDescriptor;
use crate::field::{Field, is_exported};
use crate::tag::TagOptions;
use autotable_core::{EngineResult, ResultExt, TypeRef};
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// RelationKind
// ============================================================================

/// Shape of an inferred relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Scalar reference: foreign-key column on the referencing entity
    OneToMany,
    /// Array reference: synthesized join entity
    ManyToMany,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::OneToMany => write!(f, "one-to-many"),
            RelationKind::ManyToMany => write!(f, "many-to-many"),
        }
    }
}

// ============================================================================
// Relationship
// ============================================================================

/// A relationship found on one field
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship<'a> {
    pub kind: RelationKind,
    /// Catalog key of the referencing entity
    pub from: String,
    /// Referenced record
    pub target: &'a RecordDescriptor,
    /// Catalog key of the referenced record
    pub target_key: String,
    /// Whether the referencing field is pointer-wrapped
    pub pointer: bool,
}

/// Find the record named by a type's base name.
///
/// Matches a record whose catalog key equals the lower-cased name, or whose
/// record name equals it case-insensitively. Qualified types never match.
pub fn match_record<'a>(
    type_ref: &TypeRef,
    records: &'a BTreeMap<String, RecordDescriptor>,
) -> Option<(&'a String, &'a RecordDescriptor)> {
    let name = type_ref.base_name()?;
    let lower = name.to_lowercase();

    records.get_key_value(&lower).or_else(|| {
        records
            .iter()
            .find(|(_, record)| record.name.eq_ignore_ascii_case(name))
    })
}

/// Detect a relationship on a field of entity `from`
pub fn detect<'a>(
    from: &str,
    type_ref: &TypeRef,
    records: &'a BTreeMap<String, RecordDescriptor>,
) -> Option<Relationship<'a>> {
    let (target_key, target) = match_record(type_ref, records)?;
    let kind = if type_ref.is_array() {
        RelationKind::ManyToMany
    } else {
        RelationKind::OneToMany
    };

    Some(Relationship {
        kind,
        from: from.to_string(),
        target,
        target_key: target_key.clone(),
        pointer: type_ref.is_pointer(),
    })
}

// ============================================================================
// KeyRef
// ============================================================================

/// The `id` field of an entity, as seen by the fields that reference it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRef {
    /// Catalog key of the owning entity
    pub entity: String,
    /// Declared field name, e.g. "ID"
    pub field_name: String,
    pub column: String,
    pub semantic_type: TypeRef,
    /// Explicit `type` tag carried to referencing columns
    pub explicit_type: Option<String>,
}

impl KeyRef {
    /// Key of an already-built field
    pub fn from_field(entity: impl Into<String>, field: &Field) -> Self {
        Self {
            entity: entity.into(),
            field_name: field.name.clone(),
            column: field.column.clone(),
            semantic_type: field.semantic_type.clone(),
            explicit_type: field.explicit_type.clone(),
        }
    }

    /// Key of a record, read from its descriptor.
    ///
    /// The key is the first field named `id` that becomes a column: ignored
    /// and unexported candidates are skipped. Returns `Ok(None)` when no
    /// such field exists.
    pub fn of_record(
        key: &str,
        record: &RecordDescriptor,
        tag_key: &str,
    ) -> EngineResult<Option<Self>> {
        for id in record.fields.iter().filter(|f| f.is_id_candidate()) {
            let Some(name) = id.name.as_deref() else {
                continue;
            };
            let options = TagOptions::from_tag(id.tag.as_deref(), tag_key)
                .with_context(format!("{}.{}", key, name))?;
            if options.ignore || !is_exported(name) {
                continue;
            }

            return Ok(Some(Self {
                entity: key.to_string(),
                field_name: name.to_string(),
                column: options.column.unwrap_or_else(|| name.to_snake_case()),
                semantic_type: id.type_ref.clone(),
                explicit_type: options.column_type,
            }));
        }
        Ok(None)
    }
}

// ============================================================================
// Tests
// ============================================================================
