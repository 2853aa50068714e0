//! # auto-table Codegen
//!
//! SQL rendering and migration generation for auto-table.
//!
//! This crate takes the entity catalog built by `autotable_ir` and produces
//! dependency-ordered migration files for a SQL dialect.
//!
//! ## Features
//!
//! - **Dialects**: semantic type mapping and statement templates (MySQL)
//! - **SQL Bundles**: CREATE/DROP, CRUD templates and indexes per entity
//! - **Migration Ordering**: prerequisites first, one timestamp per entity
//! - **Writers**: pluggable `write(content, path)` plus a filesystem writer
//!

// ============================================================================
// Modules
// ============================================================================

pub mod dialect;
pub mod generator;
pub mod migrations;
pub mod sql;

// ============================================================================
// Re-exports
// ============================================================================

pub use dialect::{Dialect, MySql, dialect_for};
pub use generator::{GenerationOutput, GenerationSummary, Generator, generate, summarize};
pub use migrations::{Migration, MigrationSet, plan_migrations};
pub use sql::{RecordSql, SqlBundle, TableSql, render_bundles};

use autotable_core::DatabaseType;
use autotable_ir::DEFAULT_TAG_KEY;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Output directory for migration files
    pub output_dir: PathBuf,

    /// Whether a field named `id` becomes the primary key
    pub auto_id: bool,

    /// Struct-tag key holding the options
    pub tag_key: String,

    /// Target database
    pub database: DatabaseType,

    /// Timestamp of the first migration (now when unset)
    pub start_time: Option<DateTime<Utc>>,

    /// Seconds between consecutive migrations
    pub tick_seconds: i64,

    /// Whether to overwrite existing files
    pub overwrite: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./migrations"),
            auto_id: true,
            tag_key: DEFAULT_TAG_KEY.to_string(),
            database: DatabaseType::MySQL,
            start_time: None,
            tick_seconds: 1,
            overwrite: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Disable primary-key inference from `id` fields
    pub fn without_auto_id(mut self) -> Self {
        self.auto_id = false;
        self
    }

    /// Set the tag key
    pub fn with_tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Set the target database
    pub fn with_database(mut self, database: DatabaseType) -> Self {
        self.database = database;
        self
    }

    /// Fix the first migration timestamp
    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Set the tick between migrations
    pub fn with_tick_seconds(mut self, seconds: i64) -> Self {
        self.tick_seconds = seconds;
        self
    }

    /// Allow overwriting existing files
    pub fn allow_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Start time, falling back to now
    pub fn resolved_start_time(&self) -> DateTime<Utc> {
        self.start_time.unwrap_or_else(Utc::now)
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// Represents a single generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from output directory
    pub path: PathBuf,

    /// File content
    pub content: String,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// File name as text
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeneratorConfig::default();
        assert!(config.auto_id);
        assert_eq!(config.tag_key, "autoTable");
        assert_eq!(config.database, DatabaseType::MySQL);
        assert_eq!(config.tick_seconds, 1);
        assert!(!config.overwrite);
        assert!(config.start_time.is_none());
    }

    #[test]
    fn test_config_builder() {
        let start = DateTime::from_timestamp(42, 0).unwrap();
        let config = GeneratorConfig::new()
            .with_output_dir("/tmp/out")
            .without_auto_id()
            .with_tag_key("db")
            .with_start_time(start)
            .with_tick_seconds(60)
            .allow_overwrite();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(!config.auto_id);
        assert_eq!(config.tag_key, "db");
        assert_eq!(config.resolved_start_time(), start);
        assert_eq!(config.tick_seconds, 60);
        assert!(config.overwrite);
    }

    #[test]
    fn test_generated_file_name() {
        let file = GeneratedFile::new("out/1_add_user_table.up.sql", "");
        assert_eq!(file.file_name(), "1_add_user_table.up.sql");
    }
}
