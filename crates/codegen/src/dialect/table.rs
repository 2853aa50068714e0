//! Render-ready view of an entity
//!
//! `Table` flattens an `Entity` into what the SQL templates need: column
//! clauses, the primary-key list, foreign-key clauses in field order and
//! the resolved index list.

use autotable_ir::Entity;

/// Prefix of generated index names
pub const INDEX_PREFIX: &str = "idx";

/// Prefix of generated unique index names
pub const UNIQUE_PREFIX: &str = "uq";

/// One column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub auto_increment: bool,
    pub extra: Option<String>,
    pub comment: Option<String>,
}

/// `FOREIGN KEY (column) REFERENCES table(referenced_column)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyClause {
    pub column: String,
    pub table: String,
    pub referenced_column: String,
}

/// A (possibly composite) index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// A table ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyClause>,
    pub indexes: Vec<Index>,
    pub option: Option<String>,
}

impl Table {
    /// Flatten an entity
    pub fn from_entity(entity: &Entity) -> Self {
        let columns = entity
            .fields
            .iter()
            .map(|f| Column {
                name: f.column.clone(),
                column_type: f.column_type.clone(),
                nullable: f.nullable,
                default: f.default.clone(),
                auto_increment: f.auto_increment,
                extra: f.extra.clone(),
                comment: f.comment.clone(),
            })
            .collect();

        let primary_keys = entity
            .primary_keys()
            .into_iter()
            .map(|f| f.column.clone())
            .collect();

        let foreign_keys = entity
            .foreign_keys()
            .into_iter()
            .map(|(column, fk)| ForeignKeyClause {
                column: column.to_string(),
                table: fk.table.clone(),
                referenced_column: fk.column.clone(),
            })
            .collect();

        Self {
            name: entity.name.clone(),
            columns,
            primary_keys,
            foreign_keys,
            indexes: collect_indexes(entity),
            option: entity.option.clone(),
        }
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Group the `index` / `unique` tags of an entity into indexes.
///
/// Fields naming the same index form one composite index, in field order.
/// Indexes are listed in order of first appearance.
fn collect_indexes(entity: &Entity) -> Vec<Index> {
    let mut indexes: Vec<Index> = Vec::new();

    for field in &entity.fields {
        let tagged = field
            .indexes
            .iter()
            .map(|name| (name, false))
            .chain(field.uniques.iter().map(|name| (name, true)));

        for (name, unique) in tagged {
            let name = if name.is_empty() {
                let prefix = if unique { UNIQUE_PREFIX } else { INDEX_PREFIX };
                format!("{}_{}_{}", prefix, entity.name, field.column)
            } else {
                name.clone()
            };

            match indexes
                .iter_mut()
                .find(|idx| idx.name == name && idx.unique == unique)
            {
                Some(existing) => {
                    if !existing.columns.contains(&field.column) {
                        existing.columns.push(field.column.clone());
                    }
                }
                None => indexes.push(Index {
                    name,
                    table: entity.name.clone(),
                    columns: vec![field.column.clone()],
                    unique,
                }),
            }
        }
    }

    indexes
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use autotable_ir::{ColumnTypeMapper, Field, ForeignKey, TagOptions, TypeRef};
    use pretty_assertions::assert_eq;

    struct Mapper;

    impl ColumnTypeMapper for Mapper {
        fn column_type(&self, semantic_type: &str) -> String {
            semantic_type.to_uppercase()
        }

        fn is_nullable(&self, _semantic_type: &str) -> bool {
            false
        }
    }

    fn field(name: &str, tag: &str) -> Field {
        Field::build(
            name,
            TypeRef::named("int"),
            &TagOptions::parse(tag).unwrap(),
            None,
            &Mapper,
        )
    }

    #[test]
    fn test_from_entity() {
        let entity = Entity::new("post")
            .with_option(Some("ENGINE=InnoDB".into()))
            .with_field(field("ID", "pk,autoincrement"))
            .with_field(field("AuthorId", "").with_foreign_key(ForeignKey::new("user", "id")));

        let table = Table::from_entity(&entity);
        assert_eq!(table.column_names(), vec!["id", "author_id"]);
        assert_eq!(table.primary_keys, vec!["id".to_string()]);
        assert_eq!(
            table.foreign_keys,
            vec![ForeignKeyClause {
                column: "author_id".into(),
                table: "user".into(),
                referenced_column: "id".into(),
            }]
        );
        assert!(table.columns[0].auto_increment);
        assert_eq!(table.option.as_deref(), Some("ENGINE=InnoDB"));
    }

    #[test]
    fn test_index_naming_and_grouping() {
        let entity = Entity::new("user")
            .with_field(field("Email", "unique"))
            .with_field(field("First", "index:idx_name"))
            .with_field(field("Last", "index:idx_name,index"));

        let table = Table::from_entity(&entity);
        assert_eq!(
            table.indexes,
            vec![
                Index {
                    name: "uq_user_email".into(),
                    table: "user".into(),
                    columns: vec!["email".into()],
                    unique: true,
                },
                Index {
                    name: "idx_name".into(),
                    table: "user".into(),
                    columns: vec!["first".into(), "last".into()],
                    unique: false,
                },
                Index {
                    name: "idx_user_last".into(),
                    table: "user".into(),
                    columns: vec!["last".into()],
                    unique: false,
                },
            ]
        );
    }
}
