//! # auto-table IR (Intermediate Representation)
//!
//! This crate turns record descriptors (the structured output of an
//! upstream type parser) into the entity catalog the SQL renderer works on.
//!
//! ## Core Concepts
//!
//! - **RecordDescriptor**: one annotated record with its field descriptors
//! - **Entity**: a table, built from a record or synthesized as a join table
//! - **Field**: a column with its resolved type, flags and foreign key
//! - **DependencyMap**: which entities must be created before which
//! - **SchemaBuilder**: runs field building and relationship inference
//!

// Module declarations
pub mod dependency;
pub mod descriptor;
pub mod entity;
pub mod field;
pub mod relationship;
pub mod relationship_helpers;
pub mod schema;
pub mod serialization;
pub mod tag;

// Re-export commonly used types at crate root
pub use dependency::DependencyMap;
pub use descriptor::{FieldDescriptor, RecordDescriptor};
pub use entity::Entity;
pub use field::{Field, FieldOutcome, FieldWarning, ForeignKey, WarningReason, is_exported};
pub use relationship::{KeyRef, RelationKind, Relationship};
pub use relationship_helpers::{
    create_fk_field, create_join_field, generate_fk_field_name, generate_join_table_name,
    generate_owner_key_name,
};
pub use schema::{Schema, SchemaBuilder};
pub use serialization::{
    SchemaFile, SchemaFormat, is_schema_file, load_schema_file, load_schema_from_string,
};
pub use tag::{DEFAULT_TAG_KEY, TagOption, TagOptions};

// Re-export core types that are commonly used with IR
pub use autotable_core::{
    ColumnTypeMapper, DatabaseType, EngineError, EngineResult, TypeRef, Validatable,
};

/// Field name that marks an entity's primary key (compared case-insensitively)
pub const ID_CANDIDATE: &str = "id";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        // Re-exported from core
        ColumnTypeMapper,
        DatabaseType,
        EngineError,
        EngineResult,
        // Core types
        Entity,
        Field,
        FieldDescriptor,
        FieldWarning,
        ForeignKey,
        RecordDescriptor,
        Schema,
        SchemaBuilder,
        TypeRef,
        WarningReason,
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_candidate() {
        assert_eq!(ID_CANDIDATE, "id");
        assert!("ID".eq_ignore_ascii_case(ID_CANDIDATE));
    }
}
