//! MySQL/MariaDB dialect
//!
//! Type mapping follows the groups in [`typemap`](super::typemap). Every
//! table gets two audit columns, `created_at` and `updated_at`, maintained
//! by the server.

use super::table::{Column, Index, Table};
use super::typemap::{ColumnTypeGroup, MYSQL_COLUMN_TYPES, default_column_type, trim_parens};
use super::Dialect;
use autotable_core::{ColumnTypeMapper, DatabaseType};
use std::collections::{HashMap, HashSet};

/// Audit columns appended to every table that does not declare them itself
const AUDIT_COLUMNS: &[(&str, &str)] = &[
    ("created_at", "TIMESTAMP DEFAULT CURRENT_TIMESTAMP"),
    (
        "updated_at",
        "TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP",
    ),
];

/// Column types whose defaults are string literals
const TEXT_TYPES: &[&str] = &["VARCHAR", "CHAR", "TEXT", "MEDIUMTEXT", "LONGTEXT"];

/// Value of a semantic type that no column type maps back to
const UNKNOWN_SEMANTIC_TYPE: &str = "interface{}";

/// MySQL/MariaDB dialect
#[derive(Debug, Clone)]
pub struct MySql {
    column_types: HashMap<&'static str, &'static ColumnTypeGroup>,
    nullable_types: HashSet<&'static str>,
}

impl Default for MySql {
    fn default() -> Self {
        Self::new()
    }
}

impl MySql {
    pub fn new() -> Self {
        let mut column_types = HashMap::new();
        let mut nullable_types = HashSet::new();

        for group in MYSQL_COLUMN_TYPES {
            for semantic in group.all_semantic_types() {
                column_types.insert(semantic, group);
            }
            nullable_types.extend(group.native_nullable_types());
        }

        Self {
            column_types,
            nullable_types,
        }
    }

    fn column_sql(&self, column: &Column) -> String {
        let mut parts = vec![self.quote(&column.name), column.column_type.clone()];

        if !column.nullable {
            parts.push("NOT NULL".to_string());
        }
        if let Some(default) = &column.default {
            let value = if is_text_type(&column.column_type) {
                self.quote_string(default)
            } else {
                default.clone()
            };
            parts.push(format!("DEFAULT {}", value));
        }
        if column.auto_increment {
            parts.push("AUTO_INCREMENT".to_string());
        }
        if let Some(extra) = &column.extra {
            parts.push(extra.clone());
        }
        if let Some(comment) = &column.comment {
            parts.push(format!("COMMENT {}", self.quote_string(comment)));
        }

        parts.join(" ")
    }

    /// Quoted column list with the audit columns appended
    fn select_list(&self, table: &Table) -> String {
        table
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .chain(audit_columns(table).map(|(name, _)| name))
            .map(|name| self.quote(name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn audit_columns(table: &Table) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
    AUDIT_COLUMNS
        .iter()
        .copied()
        .filter(|(name, _)| !table.columns.iter().any(|c| c.name == *name))
}

fn is_text_type(column_type: &str) -> bool {
    let upper = column_type.to_uppercase();
    TEXT_TYPES.iter().any(|t| upper.starts_with(t))
}

impl ColumnTypeMapper for MySql {
    fn column_type(&self, semantic_type: &str) -> String {
        let (name, unsigned) = match self.column_types.get(semantic_type) {
            Some(group) => group.find_column_type(semantic_type),
            None => {
                tracing::debug!(semantic_type, "No type mapping, using it as the column type");
                (semantic_type, false)
            }
        };

        let mut column_type = default_column_type(name);
        if unsigned {
            column_type.push_str(" UNSIGNED");
        }
        column_type.to_uppercase()
    }

    fn is_nullable(&self, semantic_type: &str) -> bool {
        self.nullable_types.contains(semantic_type)
    }
}

impl Dialect for MySql {
    fn database(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    fn semantic_type(&self, column_type: &str, nullable: bool) -> String {
        let upper = column_type.trim().to_uppercase();
        let (name, unsigned) = match upper.split_once(' ') {
            Some((name, rest)) => (name, rest == "UNSIGNED"),
            None => (upper.as_str(), false),
        };

        if let Some(found) = MYSQL_COLUMN_TYPES
            .iter()
            .find_map(|group| group.find_semantic_type(name, nullable, unsigned))
        {
            return found.to_string();
        }
        let trimmed = trim_parens(&upper);
        if trimmed != upper {
            return self.semantic_type(&trimmed, nullable);
        }
        UNKNOWN_SEMANTIC_TYPE.to_string()
    }

    fn quote(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn quote_string(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn create_table_sql(&self, table: &Table) -> Vec<String> {
        let mut body: Vec<String> = table.columns.iter().map(|c| self.column_sql(c)).collect();
        body.extend(
            audit_columns(table)
                .map(|(name, definition)| format!("{} {}", self.quote(name), definition)),
        );

        if !table.primary_keys.is_empty() {
            let keys: Vec<String> = table.primary_keys.iter().map(|k| self.quote(k)).collect();
            body.push(format!("PRIMARY KEY ({})", keys.join(", ")));
        }
        for fk in &table.foreign_keys {
            body.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                self.quote(&fk.column),
                self.quote(&fk.table),
                self.quote(&fk.referenced_column)
            ));
        }

        let option = table
            .option
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .map(|o| format!(" {}", o.trim()))
            .unwrap_or_default();

        vec![format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n){};",
            self.quote(&table.name),
            body.join(",\n  "),
            option
        )]
    }

    fn drop_table_sql(&self, table: &Table) -> Vec<String> {
        vec![format!("DROP TABLE IF EXISTS {};", self.quote(&table.name))]
    }

    fn find_all_sql(&self, table: &Table) -> Vec<String> {
        if table.columns.is_empty() {
            return Vec::new();
        }
        vec![format!(
            "SELECT {} FROM {};",
            self.select_list(table),
            self.quote(&table.name)
        )]
    }

    fn find_sql(&self, table: &Table) -> Vec<String> {
        let Some(key) = table.columns.first() else {
            return Vec::new();
        };
        vec![format!(
            "SELECT {} FROM {} WHERE {} = ?;",
            self.select_list(table),
            self.quote(&table.name),
            self.quote(&key.name)
        )]
    }

    fn insert_sql(&self, table: &Table) -> Vec<String> {
        if table.columns.is_empty() {
            return Vec::new();
        }
        let columns: Vec<String> = table.columns.iter().map(|c| self.quote(&c.name)).collect();
        let values = vec!["?"; columns.len()];
        vec![format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.quote(&table.name),
            columns.join(", "),
            values.join(", ")
        )]
    }

    fn delete_sql(&self, table: &Table) -> Vec<String> {
        let Some(key) = table.columns.first() else {
            return Vec::new();
        };
        vec![format!(
            "DELETE FROM {} WHERE {} = ?;",
            self.quote(&table.name),
            self.quote(&key.name)
        )]
    }

    fn update_sql(&self, table: &Table) -> Vec<String> {
        let Some((key, rest)) = table.columns.split_first() else {
            return Vec::new();
        };
        if rest.is_empty() {
            return Vec::new();
        }
        let set: Vec<String> = rest
            .iter()
            .map(|c| format!("{} = ?", self.quote(&c.name)))
            .collect();
        vec![format!(
            "UPDATE {} SET {} WHERE {} = ?;",
            self.quote(&table.name),
            set.join(", "),
            self.quote(&key.name)
        )]
    }

    fn create_index_sql(&self, index: &Index) -> Vec<String> {
        let columns: Vec<String> = index.columns.iter().map(|c| self.quote(c)).collect();
        let unique = if index.unique { "UNIQUE " } else { "" };
        vec![format!(
            "CREATE {}INDEX {} ON {} ({});",
            unique,
            self.quote(&index.name),
            self.quote(&index.table),
            columns.join(",")
        )]
    }
}

// ============================================================================
// Tests
// ============================================================================
