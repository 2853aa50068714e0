//! # Generator Orchestrator
//!
//! The `Generator` is the top-level entry point. It takes the record
//! descriptors and a [`GeneratorConfig`], builds the schema, renders SQL
//! for every entity and plans the migrations.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<RecordDescriptor> + GeneratorConfig
//!         │
//!         ▼
//!   SchemaBuilder::build(dialect)      → Schema { entities, dependencies, warnings }
//!         │
//!         ├──► sql::render_bundles()        → BTreeMap<entity, SqlBundle>
//!         ├──► migrations::plan_migrations() → MigrationSet
//!         │
//!         ▼
//!   GenerationOutput { schema, bundles, migrations, warnings }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use autotable_codegen::{Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig::default().with_output_dir("migrations");
//! let output = Generator::new(config).generate_and_write(records)?;
//! println!("{}", output.summary());
//! ```

use std::collections::BTreeMap;

use autotable_core::{EngineResult, Validatable};
use autotable_ir::{FieldWarning, RecordDescriptor, Schema, SchemaBuilder};

use crate::dialect::dialect_for;
use crate::migrations::{self, MigrationSet};
use crate::sql::{self, SqlBundle};
use crate::GeneratorConfig;

// ============================================================================
// GenerationOutput
// ============================================================================

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub schema: Schema,
    pub bundles: BTreeMap<String, SqlBundle>,
    pub migrations: MigrationSet,
    pub warnings: Vec<FieldWarning>,
}

impl GenerationOutput {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn summary(&self) -> GenerationSummary {
        summarize(self)
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Top-level generator running the whole pipeline.
///
/// Stateless aside from its configuration; every run builds its own
/// catalogs and drops them when the output is returned.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the pipeline on a set of records.
    ///
    /// # Steps
    ///
    /// 1. **Build** the schema: fields, primary keys, relationships and the
    ///    dependency map. Dropped fields become warnings.
    /// 2. **Validate** that every foreign key points at a known column.
    /// 3. **Render** the SQL bundle of every entity.
    /// 4. **Plan** the migrations in dependency order.
    ///
    /// # Errors
    ///
    /// Malformed tags, multiple IDs, duplicate entities and circular
    /// dependencies abort the run before any output exists.
    pub fn generate(
        &self,
        records: impl IntoIterator<Item = RecordDescriptor>,
    ) -> EngineResult<GenerationOutput> {
        let dialect = dialect_for(self.config.database);

        // ── 1. Build schema ──────────────────────────────────────────────
        let mut builder = SchemaBuilder::new()
            .with_auto_id(self.config.auto_id)
            .with_tag_key(self.config.tag_key.clone());
        builder.add_records(records)?;
        let schema = builder.build(&*dialect)?;

        // ── 2. Validate ──────────────────────────────────────────────────
        schema.validate()?;

        // ── 3. Render SQL ────────────────────────────────────────────────
        let bundles = sql::render_bundles(&*dialect, &schema);

        // ── 4. Plan migrations ───────────────────────────────────────────
        let migrations = migrations::plan_migrations(
            &schema.dependencies,
            &bundles,
            self.config.resolved_start_time(),
            self.config.tick_seconds,
        )?;

        let warnings = schema.warnings.clone();

        tracing::info!(
            entities = schema.entity_count(),
            migrations = migrations.len(),
            warnings = warnings.len(),
            database = %self.config.database,
            "Generation complete",
        );

        Ok(GenerationOutput {
            schema,
            bundles,
            migrations,
            warnings,
        })
    }

    /// Generate and write every migration file to the output directory.
    ///
    /// Returns the output so callers can inspect warnings and counts.
    pub fn generate_and_write(
        &self,
        records: impl IntoIterator<Item = RecordDescriptor>,
    ) -> EngineResult<GenerationOutput> {
        let output = self.generate(records)?;
        let written = output
            .migrations
            .write_to_disk(&self.config.output_dir, self.config.overwrite)?;
        tracing::info!(
            output_dir = %self.config.output_dir.display(),
            files = written,
            "Migrations written to disk",
        );
        Ok(output)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Generate with the default configuration.
pub fn generate(
    records: impl IntoIterator<Item = RecordDescriptor>,
) -> EngineResult<GenerationOutput> {
    Generator::with_defaults().generate(records)
}

// ============================================================================
// GenerationSummary
// ============================================================================

/// Counts reported after a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub entities: usize,
    pub join_tables: usize,
    pub migration_files: usize,
    pub warning_count: usize,
}

impl GenerationSummary {
    pub fn from_output(output: &GenerationOutput) -> Self {
        Self {
            entities: output.schema.entity_count(),
            join_tables: output.schema.join_tables().count(),
            migration_files: output.migrations.files().len(),
            warning_count: output.warnings.len(),
        }
    }

    /// Format the summary as a box
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(512);

        out.push_str("╔══════════════════════════════════════════════════╗\n");
        out.push_str("║         Migration Generation Complete           ║\n");
        out.push_str("╠══════════════════════════════════════════════════╣\n");
        out.push_str(&format!("║  Entities:    {:<35}║\n", self.entities));
        out.push_str(&format!("║    Join:      {:<35}║\n", self.join_tables));
        out.push_str(&format!("║  Files:       {:<35}║\n", self.migration_files));
        out.push_str(&format!("║  Warnings:    {:<35}║\n", self.warning_count));
        out.push_str("╚══════════════════════════════════════════════════╝\n");

        out
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Produce a [`GenerationSummary`] from a [`GenerationOutput`].
pub fn summarize(output: &GenerationOutput) -> GenerationSummary {
    GenerationSummary::from_output(output)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use autotable_core::EngineError;
    use autotable_ir::{FieldDescriptor, TypeRef, WarningReason};
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn ty(s: &str) -> TypeRef {
        s.parse().unwrap()
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig::new().with_start_time(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    }

    fn user() -> RecordDescriptor {
        RecordDescriptor::new("User")
            .with_field(FieldDescriptor::new("ID", ty("int")))
            .with_field(FieldDescriptor::new("Name", ty("string")))
    }

    fn post() -> RecordDescriptor {
        RecordDescriptor::new("Post")
            .with_field(FieldDescriptor::new("ID", ty("int")))
            .with_field(FieldDescriptor::new("Author", ty("User")))
    }

    #[test]
    fn test_user_post_example() {
        let output = Generator::new(config()).generate(vec![post(), user()]).unwrap();

        assert_eq!(output.migrations.order(), vec!["user", "post"]);

        let user_up = &output.migrations.get("user").unwrap().up.content;
        assert!(user_up.contains("`id` INT NOT NULL AUTO_INCREMENT"));
        assert!(user_up.contains("PRIMARY KEY (`id`)"));

        let post_up = &output.migrations.get("post").unwrap().up.content;
        assert!(post_up.contains("FOREIGN KEY (`author_id`) REFERENCES `user`(`id`)"));
        assert!(!output.has_warnings());
    }

    #[test]
    fn test_many_to_many_example() {
        let post = RecordDescriptor::new("Post")
            .with_field(FieldDescriptor::new("ID", ty("int")))
            .with_field(FieldDescriptor::new("Tag", ty("[]Tag")));
        let tag = RecordDescriptor::new("Tag").with_field(FieldDescriptor::new("ID", ty("int")));

        let output = Generator::new(config()).generate(vec![post, tag]).unwrap();
        assert_eq!(output.migrations.order(), vec!["post", "tag", "post_tag"]);

        let join = output.schema.get("post_tag").unwrap();
        assert_eq!(join.columns(), vec!["post_id", "tag_id"]);
        assert_eq!(output.schema.get("post").unwrap().columns(), vec!["id"]);

        let summary = output.summary();
        assert_eq!(summary.entities, 3);
        assert_eq!(summary.join_tables, 1);
        assert_eq!(summary.migration_files, 6);
    }

    #[test]
    fn test_warnings_collected() {
        let user = user().with_field(
            FieldDescriptor::new("Secret", ty("string")).with_tag(r#"autoTable:"-""#),
        );
        let output = Generator::new(config()).generate(vec![user]).unwrap();

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].reason, WarningReason::Ignored);
        assert_eq!(output.summary().warning_count, 1);
    }

    #[test]
    fn test_fatal_tag_error() {
        let user = user().with_field(
            FieldDescriptor::new("Nick", ty("string")).with_tag(r#"autoTable:"size:10""#),
        );
        let err = Generator::new(config()).generate(vec![user]).unwrap_err();
        assert!(err.to_string().contains("Unknown tag option"));
    }

    #[test]
    fn test_duplicate_entity() {
        let err = Generator::new(config())
            .generate(vec![user(), user()])
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateEntity(_)));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = Generator::new(config());
        let a = generator.generate(vec![post(), user()]).unwrap();
        let b = generator.generate(vec![user(), post()]).unwrap();
        assert_eq!(a.migrations, b.migrations);
    }

    #[test]
    fn test_generate_and_write() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = Generator::new(config().with_output_dir(tmp.path()));

        generator.generate_and_write(vec![user()]).unwrap();
        assert!(tmp.path().join("1700000000_add_user_table.up.sql").exists());
        assert!(tmp.path().join("1700000000_add_user_table.down.sql").exists());
    }

    #[test]
    fn test_summary_display() {
        let summary = GenerationSummary {
            entities: 2,
            join_tables: 0,
            migration_files: 4,
            warning_count: 1,
        };
        let text = summary.display();
        assert!(text.contains("Migration Generation Complete"));
        assert!(text.contains("Entities:    2"));
        assert_eq!(text, summary.to_string());
    }
}
