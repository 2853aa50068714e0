//! # SQL Dialects
//!
//! A `Dialect` maps semantic types to column types (through the
//! `ColumnTypeMapper` half the IR builder uses) and renders the statement
//! templates for one database family. Rendering is pure: the same table
//! always produces the same text.

pub mod mysql;
pub mod table;
pub mod typemap;

pub use mysql::MySql;
pub use table::{Column, ForeignKeyClause, Index, Table};

use autotable_core::{ColumnTypeMapper, DatabaseType};

/// Statement renderer for one database family.
///
/// Every template returns a list of statements; a template that cannot be
/// formed for the table (no columns, nothing to update) returns none.
pub trait Dialect: ColumnTypeMapper + Send + Sync {
    /// Database family this dialect renders
    fn database(&self) -> DatabaseType;

    /// Semantic type stored in a column type (reverse of `column_type`)
    fn semantic_type(&self, column_type: &str, nullable: bool) -> String;

    /// Quote an identifier
    fn quote(&self, ident: &str) -> String;

    /// Quote a string literal
    fn quote_string(&self, text: &str) -> String;

    fn create_table_sql(&self, table: &Table) -> Vec<String>;

    fn drop_table_sql(&self, table: &Table) -> Vec<String>;

    fn find_all_sql(&self, table: &Table) -> Vec<String>;

    fn find_sql(&self, table: &Table) -> Vec<String>;

    fn insert_sql(&self, table: &Table) -> Vec<String>;

    fn delete_sql(&self, table: &Table) -> Vec<String>;

    fn update_sql(&self, table: &Table) -> Vec<String>;

    fn create_index_sql(&self, index: &Index) -> Vec<String>;
}

/// Get the dialect for a database family
pub fn dialect_for(database: DatabaseType) -> Box<dyn Dialect> {
    match database {
        DatabaseType::MySQL => Box::new(MySql::new()),
    }
}
