//! # Migration Generation
//!
//! Turns the dependency map and the rendered SQL bundles into an ordered
//! list of migration pairs. Referenced tables come first; join tables come
//! after both sides.
//!
//! ## Generated Files
//!
//! Each entity produces two files sharing one timestamp:
//! ```text
//! {timestamp}_add_{entity}_table.up.sql    CREATE TABLE + indexes
//! {timestamp}_add_{entity}_table.down.sql  DROP TABLE
//! ```
//!
//! Timestamps are unix seconds, strictly increasing in emission order.

pub mod order;

pub use order::{Emission, emission_order};

use crate::GeneratedFile;
use crate::sql::SqlBundle;
use autotable_core::{EngineError, EngineResult};
use autotable_ir::DependencyMap;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;

/// Up migration filename
pub fn up_file_name(timestamp: i64, entity: &str) -> String {
    format!("{}_add_{}_table.up.sql", timestamp, entity)
}

/// Down migration filename
pub fn down_file_name(timestamp: i64, entity: &str) -> String {
    format!("{}_add_{}_table.down.sql", timestamp, entity)
}

// ============================================================================
// Migration
// ============================================================================

/// The migration pair of one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub entity: String,
    pub timestamp: i64,
    pub up: GeneratedFile,
    pub down: GeneratedFile,
}

impl Migration {
    fn new(entity: &str, timestamp: i64, bundle: &SqlBundle) -> Self {
        Self {
            entity: entity.to_string(),
            timestamp,
            up: GeneratedFile::new(
                up_file_name(timestamp, entity),
                format!("{}\n", bundle.up_sql()),
            ),
            down: GeneratedFile::new(
                down_file_name(timestamp, entity),
                format!("{}\n", bundle.down_sql()),
            ),
        }
    }
}

// ============================================================================
// MigrationSet
// ============================================================================

/// Migrations in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSet {
    migrations: Vec<Migration>,
}

impl MigrationSet {
    pub fn iter(&self) -> impl Iterator<Item = &Migration> {
        self.migrations.iter()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Entity names in emission order
    pub fn order(&self) -> Vec<&str> {
        self.migrations.iter().map(|m| m.entity.as_str()).collect()
    }

    /// Migration of one entity
    pub fn get(&self, entity: &str) -> Option<&Migration> {
        self.migrations.iter().find(|m| m.entity == entity)
    }

    /// All files, up then down for each entity
    pub fn files(&self) -> Vec<&GeneratedFile> {
        self.migrations
            .iter()
            .flat_map(|m| [&m.up, &m.down])
            .collect()
    }

    /// Hand every file to `write(content, path)` in order.
    ///
    /// Stops at the first failure; files already written are kept.
    pub fn write_with<F>(&self, dir: &Path, mut write: F) -> EngineResult<usize>
    where
        F: FnMut(&str, &Path) -> EngineResult<()>,
    {
        let mut written = 0;
        for file in self.files() {
            let path = dir.join(&file.path);
            if let Err(e) = write(&file.content, &path) {
                tracing::error!(path = %path.display(), error = %e, "Failed to write migration");
                return Err(e);
            }
            written += 1;
        }
        Ok(written)
    }

    /// Write every file under `dir`, creating it if needed.
    ///
    /// Existing files are an error unless `overwrite` is set.
    pub fn write_to_disk(&self, dir: &Path, overwrite: bool) -> EngineResult<usize> {
        std::fs::create_dir_all(dir).map_err(|e| EngineError::DirectoryCreate {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        self.write_with(dir, |content, path| {
            if !overwrite && path.exists() {
                return Err(EngineError::OutputExists(path.to_path_buf()));
            }
            std::fs::write(path, content).map_err(|e| EngineError::FileWrite {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        })
    }
}

impl<'a> IntoIterator for &'a MigrationSet {
    type Item = &'a Migration;
    type IntoIter = std::slice::Iter<'a, Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.migrations.iter()
    }
}

// ============================================================================
// Planning
// ============================================================================

/// Build the migration set.
///
/// Every entity of the map needs a bundle; a missing one is
/// `EntityNotFound`. Ordering errors come from [`emission_order`].
pub fn plan_migrations(
    dependencies: &DependencyMap,
    bundles: &BTreeMap<String, SqlBundle>,
    start: DateTime<Utc>,
    tick_seconds: i64,
) -> EngineResult<MigrationSet> {
    if let Some(missing) = dependencies.names().find(|n| !bundles.contains_key(*n)) {
        return Err(EngineError::EntityNotFound(format!(
            "{} (no SQL rendered)",
            missing
        )));
    }

    let order = emission_order(dependencies, start.timestamp(), tick_seconds)?;

    let mut migrations = Vec::with_capacity(order.len());
    for Emission { entity, timestamp } in order {
        let bundle = bundles
            .get(&entity)
            .ok_or_else(|| EngineError::EntityNotFound(entity.clone()))?;
        migrations.push(Migration::new(&entity, timestamp, bundle));
    }

    tracing::info!(migrations = migrations.len(), "Migrations planned");

    Ok(MigrationSet { migrations })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::MySql;
    use crate::sql::render_bundles;
    use autotable_ir::{FieldDescriptor, RecordDescriptor, Schema, SchemaBuilder, TypeRef};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn ty(s: &str) -> TypeRef {
        s.parse().unwrap()
    }

    fn blog() -> Schema {
        let user = RecordDescriptor::new("User")
            .with_field(FieldDescriptor::new("ID", ty("int")))
            .with_field(FieldDescriptor::new("Name", ty("string")));
        let post = RecordDescriptor::new("Post")
            .with_field(FieldDescriptor::new("ID", ty("int")))
            .with_field(FieldDescriptor::new("Author", ty("User")))
            .with_field(FieldDescriptor::new("Tag", ty("[]Tag")));
        let tag = RecordDescriptor::new("Tag").with_field(FieldDescriptor::new("ID", ty("int")));

        let mut builder = SchemaBuilder::new();
        builder.add_records(vec![post, user, tag]).unwrap();
        builder.build(&MySql::new()).unwrap()
    }

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_600_000_000, 0).unwrap()
    }

    fn plan(schema: &Schema) -> MigrationSet {
        let bundles = render_bundles(&MySql::new(), schema);
        plan_migrations(&schema.dependencies, &bundles, start(), 1).unwrap()
    }

    #[test]
    fn test_plan_order_and_names() {
        let set = plan(&blog());
        assert_eq!(set.order(), vec!["tag", "user", "post", "post_tag"]);

        let post = set.get("post").unwrap();
        assert_eq!(post.timestamp, 1_600_000_002);
        assert_eq!(
            post.up.path,
            PathBuf::from("1600000002_add_post_table.up.sql")
        );
        assert_eq!(
            post.down.path,
            PathBuf::from("1600000002_add_post_table.down.sql")
        );
        assert!(post.up.content.contains(
            "FOREIGN KEY (`author_id`) REFERENCES `user`(`id`)"
        ));
        assert_eq!(post.down.content, "DROP TABLE IF EXISTS `post`;\n");
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let set = plan(&blog());
        let stamps: Vec<i64> = set.iter().map(|m| m.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(set.files().len(), 8);
    }

    #[test]
    fn test_missing_bundle() {
        let schema = blog();
        let mut bundles = render_bundles(&MySql::new(), &schema);
        bundles.remove("tag");

        let err = plan_migrations(&schema.dependencies, &bundles, start(), 1).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_write_with_order_and_stop() {
        let set = plan(&blog());
        let dir = Path::new("out");

        let mut seen = Vec::new();
        let written = set
            .write_with(dir, |_, path| {
                seen.push(path.to_path_buf());
                Ok(())
            })
            .unwrap();
        assert_eq!(written, 8);
        assert_eq!(seen[0], dir.join("1600000000_add_tag_table.up.sql"));
        assert_eq!(seen[1], dir.join("1600000000_add_tag_table.down.sql"));

        let mut calls = 0;
        let err = set
            .write_with(dir, |_, path| {
                calls += 1;
                if calls == 3 {
                    Err(EngineError::FileWrite {
                        path: path.to_path_buf(),
                        message: "disk full".into(),
                    })
                } else {
                    Ok(())
                }
            })
            .unwrap_err();
        assert_eq!(calls, 3);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_write_to_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("migrations");
        let set = plan(&blog());

        assert_eq!(set.write_to_disk(&dir, false).unwrap(), 8);
        let up = std::fs::read_to_string(dir.join("1600000000_add_tag_table.up.sql")).unwrap();
        assert!(up.starts_with("CREATE TABLE IF NOT EXISTS `tag` ("));

        let err = set.write_to_disk(&dir, false).unwrap_err();
        assert!(matches!(err, EngineError::OutputExists(_)));

        assert_eq!(set.write_to_disk(&dir, true).unwrap(), 8);
    }
}
