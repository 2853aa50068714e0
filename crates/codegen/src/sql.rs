//! Rendered SQL per entity
//!
//! A `SqlBundle` holds every statement the dialect renders for one entity:
//! the table DDL, the CRUD templates and the index statements.

use crate::dialect::{Dialect, Table};
use autotable_ir::{Entity, Schema};
use std::collections::BTreeMap;

/// Table-level statements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSql {
    pub create: Vec<String>,
    pub drop: Vec<String>,
}

/// Row-level statement templates with `?` placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSql {
    pub find_all: Vec<String>,
    pub find: Vec<String>,
    pub insert: Vec<String>,
    pub delete: Vec<String>,
    pub update: Vec<String>,
}

/// Everything rendered for one entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlBundle {
    pub table: TableSql,
    pub record: RecordSql,
    pub indexes: Vec<String>,
}

impl SqlBundle {
    /// Render an entity with a dialect
    pub fn render(dialect: &dyn Dialect, entity: &Entity) -> Self {
        let table = Table::from_entity(entity);

        Self {
            table: TableSql {
                create: dialect.create_table_sql(&table),
                drop: dialect.drop_table_sql(&table),
            },
            record: RecordSql {
                find_all: dialect.find_all_sql(&table),
                find: dialect.find_sql(&table),
                insert: dialect.insert_sql(&table),
                delete: dialect.delete_sql(&table),
                update: dialect.update_sql(&table),
            },
            indexes: table
                .indexes
                .iter()
                .flat_map(|index| dialect.create_index_sql(index))
                .collect(),
        }
    }

    /// Up migration: CREATE TABLE followed by its indexes
    pub fn up_sql(&self) -> String {
        self.table
            .create
            .iter()
            .chain(&self.indexes)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Down migration: DROP TABLE
    pub fn down_sql(&self) -> String {
        self.table.drop.join("\n")
    }
}

/// Render every entity of a schema, keyed by catalog key
pub fn render_bundles(dialect: &dyn Dialect, schema: &Schema) -> BTreeMap<String, SqlBundle> {
    schema
        .entities
        .iter()
        .map(|(name, entity)| (name.clone(), SqlBundle::render(dialect, entity)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::MySql;
    use autotable_ir::{FieldDescriptor, RecordDescriptor, SchemaBuilder, TypeRef};
    use pretty_assertions::assert_eq;

    fn ty(s: &str) -> TypeRef {
        s.parse().unwrap()
    }

    fn schema() -> Schema {
        let user = RecordDescriptor::new("User")
            .with_field(FieldDescriptor::new("ID", ty("int")))
            .with_field(
                FieldDescriptor::new("Email", ty("string")).with_tag(r#"autoTable:"unique""#),
            );
        let mut builder = SchemaBuilder::new();
        builder.add_record(user).unwrap();
        builder.build(&MySql::new()).unwrap()
    }

    #[test]
    fn test_render_bundle() {
        let dialect = MySql::new();
        let bundles = render_bundles(&dialect, &schema());
        let user = &bundles["user"];

        assert_eq!(
            user.up_sql(),
            "CREATE TABLE IF NOT EXISTS `user` (\n  \
             `id` INT NOT NULL AUTO_INCREMENT,\n  \
             `email` VARCHAR(255) NOT NULL,\n  \
             `created_at` TIMESTAMP DEFAULT CURRENT_TIMESTAMP,\n  \
             `updated_at` TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,\n  \
             PRIMARY KEY (`id`)\n\
             );\n\
             CREATE UNIQUE INDEX `uq_user_email` ON `user` (`email`);"
        );
        assert_eq!(user.down_sql(), "DROP TABLE IF EXISTS `user`;");
        assert_eq!(
            user.record.update,
            vec!["UPDATE `user` SET `email` = ? WHERE `id` = ?;".to_string()]
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let dialect = MySql::new();
        let schema = schema();
        assert_eq!(render_bundles(&dialect, &schema), render_bundles(&dialect, &schema));
    }
}
