//! Loading record descriptors from schema files
//!
//! A schema file lists the records produced by the upstream type parser:
//!
//! ```json
//! { "records": [ { "name": "User", "fields": [ { "name": "ID", "type": "int" } ] } ] }
//! ```
//!
//! JSON and TOML encodings are accepted, chosen by file extension.

use crate::descriptor::RecordDescriptor;
use autotable_core::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Constants
// ============================================================================

/// File extensions recognised as schema files
pub const SCHEMA_EXTENSIONS: &[&str] = &["json", "toml"];

// ============================================================================
// Schema File
// ============================================================================

/// Encoding of a schema file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Toml,
}

impl SchemaFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "json" => Some(SchemaFormat::Json),
            "toml" => Some(SchemaFormat::Toml),
            _ => None,
        }
    }
}

/// Contents of one schema file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub records: Vec<RecordDescriptor>,
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a schema file, picking the decoder from the extension
pub fn load_schema_file(path: impl AsRef<Path>) -> EngineResult<SchemaFile> {
    let path = path.as_ref();
    let format = SchemaFormat::from_path(path).ok_or_else(|| EngineError::InvalidInput {
        path: path.to_path_buf(),
        message: "expected a .json or .toml file".to_string(),
    })?;

    let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_schema_from_string(&text, format).map_err(|e| match e {
        EngineError::JsonSerialization(_) | EngineError::TomlDeserialization(_) => {
            EngineError::InvalidInput {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
        other => other,
    })
}

/// Decode a schema from text
pub fn load_schema_from_string(text: &str, format: SchemaFormat) -> EngineResult<SchemaFile> {
    let file = match format {
        SchemaFormat::Json => serde_json::from_str(text)?,
        SchemaFormat::Toml => toml::from_str(text)?,
    };
    Ok(file)
}

/// Check if a path looks like a schema file
pub fn is_schema_file(path: impl AsRef<Path>) -> bool {
    SchemaFormat::from_path(path).is_some()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JSON: &str = r#"{
        "records": [
            { "name": "User", "fields": [ { "name": "ID", "type": "int" } ] },
            { "name": "Post", "table": "posts", "fields": [
                { "name": "ID", "type": "int" },
                { "name": "Author", "type": "*User", "tag": "autoTable:\"null\"" }
            ] }
        ]
    }"#;

    const TOML: &str = r#"
        [[records]]
        name = "User"
        option = "ENGINE=InnoDB"

        [[records.fields]]
        name = "ID"
        type = "int"

        [[records.fields]]
        name = "Email"
        type = "string"
        tag = 'autoTable:"unique"'
        comment = "login name"
    "#;

    #[test]
    fn test_load_json_string() {
        let file = load_schema_from_string(JSON, SchemaFormat::Json).unwrap();
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.records[1].table_name(), "posts");
        assert!(file.records[1].fields[1].type_ref.is_pointer());
    }

    #[test]
    fn test_load_toml_string() {
        let file = load_schema_from_string(TOML, SchemaFormat::Toml).unwrap();
        let user = &file.records[0];
        assert_eq!(user.option.as_deref(), Some("ENGINE=InnoDB"));
        assert_eq!(user.fields[1].tag.as_deref(), Some(r#"autoTable:"unique""#));
        assert_eq!(user.fields[1].comment.as_deref(), Some("login name"));
    }

    #[test]
    fn test_load_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models.json");
        std::fs::write(&path, JSON).unwrap();

        let file = load_schema_file(&path).unwrap();
        assert_eq!(file.records[0].name, "User");
    }

    #[test]
    fn test_invalid_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "records = 3").unwrap();

        let err = load_schema_file(&path).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref path, .. } if path.ends_with("broken.toml")));
    }

    #[test]
    fn test_missing_file() {
        let err = load_schema_file("/nonexistent/models.json").unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_schema_format_detection() {
        assert_eq!(SchemaFormat::from_path("a/b.json"), Some(SchemaFormat::Json));
        assert_eq!(SchemaFormat::from_path("b.toml"), Some(SchemaFormat::Toml));
        assert_eq!(SchemaFormat::from_path("b.yaml"), None);
        assert!(is_schema_file("x.json"));
        assert!(!is_schema_file("README"));
    }
}
