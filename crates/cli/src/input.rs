//! Finding and loading record description files

use autotable_core::{EngineError, EngineResult, ResultExt};
use autotable_ir::{RecordDescriptor, is_schema_file, load_schema_file};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Stem suffix of files that are never loaded
const TEST_FILE_SUFFIX: &str = "_test";

/// Resolve a possibly relative path against the working directory
pub fn resolve_source(source: &Path, cwd: &Path) -> PathBuf {
    if source.is_absolute() {
        source.to_path_buf()
    } else {
        cwd.join(source)
    }
}

fn is_test_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(TEST_FILE_SUFFIX))
}

/// All `.json` / `.toml` files under `dir`, sorted, skipping `*_test` files
pub fn discover_schema_files(dir: &Path) -> EngineResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| EngineError::FileRead {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_schema_file(path) {
            continue;
        }
        if is_test_file(path) {
            tracing::debug!(path = %path.display(), "Skipping test file");
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Load every record found at `source` (a directory or a single file)
pub fn load_records(source: &Path) -> EngineResult<Vec<RecordDescriptor>> {
    let files = if source.is_dir() {
        discover_schema_files(source)?
    } else if source.is_file() {
        vec![source.to_path_buf()]
    } else {
        return Err(EngineError::InvalidConfig(format!(
            "source '{}' does not exist",
            source.display()
        )));
    };

    let mut records = Vec::new();
    for file in &files {
        let schema = load_schema_file(file).with_context(file.display().to_string())?;
        tracing::debug!(
            path = %file.display(),
            records = schema.records.len(),
            "Loaded schema file"
        );
        records.extend(schema.records);
    }

    tracing::info!(files = files.len(), records = records.len(), "Records loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const USER_JSON: &str = r#"{
        "records": [
            { "name": "User", "fields": [ { "name": "ID", "type": "int" } ] }
        ]
    }"#;

    const POST_TOML: &str = r#"
[[records]]
name = "Post"

[[records.fields]]
name = "ID"
type = "int"
"#;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_resolve_source() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_source(Path::new("models"), cwd), PathBuf::from("/work/models"));
        assert_eq!(resolve_source(Path::new("/abs"), cwd), PathBuf::from("/abs"));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "user.json", USER_JSON);
        write(dir.path(), "nested/post.toml", POST_TOML);
        write(dir.path(), "user_test.json", USER_JSON);
        write(dir.path(), "README.md", "# models");

        let files = discover_schema_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("nested/post.toml"), dir.path().join("user.json")]
        );
    }

    #[test]
    fn test_load_records_from_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "user.json", USER_JSON);
        write(dir.path(), "post.toml", POST_TOML);

        let records = load_records(dir.path()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Post", "User"]);
    }

    #[test]
    fn test_load_records_from_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "user.json", USER_JSON);

        let records = load_records(&dir.path().join("user.json")).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_bad_file_names_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "broken.json", "{ not json");

        let err = load_records(dir.path()).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = load_records(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }
}
