//! Relationship Helper Functions
//!
//! Naming conventions and field construction for the columns synthesized
//! by relationship inference.
//!
//! - **One-to-many**: a foreign-key column `<FieldName><PkFieldName>` on the
//!   referencing entity (`Author` + `ID` → `AuthorId`, column `author_id`)
//! - **Many-to-many**: a join entity `<current>_<target>` holding one
//!   foreign key to each side, both part of its primary key

use crate::field::{Field, ForeignKey};
use crate::relationship::KeyRef;
use crate::tag::TagOptions;
use autotable_core::{ColumnTypeMapper, TypeRef};
use heck::ToUpperCamelCase;

// ============================================================================
// Names
// ============================================================================

/// Generate a foreign-key field name from the referencing field and the
/// referenced primary-key field
///
/// # Examples
///
/// - ("Author", "ID") -> "AuthorId"
/// - ("reviewer", "Id") -> "ReviewerId"
pub fn generate_fk_field_name(field_name: &str, pk_field_name: &str) -> String {
    format!(
        "{}{}",
        field_name.to_upper_camel_case(),
        pk_field_name.to_upper_camel_case()
    )
}

/// Generate a join table name for a many-to-many relationship
///
/// # Examples
///
/// - ("post", "Tag") -> "post_tag"
/// - ("blog_post", "BlogTag") -> "blog_post_blogtag"
pub fn generate_join_table_name(current_key: &str, target_type: &str) -> String {
    format!("{}_{}", current_key, target_type.to_lowercase())
}

/// Name of the join column pointing back at the owning entity
///
/// # Examples
///
/// - "post" -> "post_id"
pub fn generate_owner_key_name(current_key: &str) -> String {
    format!("{}_{}", current_key, crate::ID_CANDIDATE)
}

// ============================================================================
// Field construction
// ============================================================================

/// Create the foreign-key column for a one-to-many reference.
///
/// The column is typed as the target's primary key (pointer-wrapped when the
/// referencing field is a pointer) and inherits the target's explicit
/// `type` unless the referencing field sets its own. The referencing
/// field's other tag options still apply.
pub fn create_fk_field<M: ColumnTypeMapper + ?Sized>(
    field_name: &str,
    pointer: bool,
    target: &KeyRef,
    options: &TagOptions,
    comment: Option<&str>,
    mapper: &M,
) -> Field {
    let name = generate_fk_field_name(field_name, &target.field_name);
    let semantic_type = if pointer {
        TypeRef::pointer(target.semantic_type.clone())
    } else {
        target.semantic_type.clone()
    };

    let mut options = options.clone();
    if options.column_type.is_none() {
        options.column_type = target.explicit_type.clone();
    }

    Field::build(&name, semantic_type, &options, comment, mapper)
        .with_foreign_key(ForeignKey::new(&target.entity, &target.column))
}

/// Create one key column of a join entity.
///
/// Join columns are part of the composite primary key, never
/// auto-increment, and take no options from the array field.
pub fn create_join_field<M: ColumnTypeMapper + ?Sized>(
    name: &str,
    target: &KeyRef,
    mapper: &M,
) -> Field {
    let options = TagOptions {
        primary_key: true,
        column_type: target.explicit_type.clone(),
        ..TagOptions::default()
    };

    Field::build(name, target.semantic_type.clone(), &options, None, mapper)
        .with_foreign_key(ForeignKey::new(&target.entity, &target.column))
}

// ============================================================================
// Tests
// ============================================================================
