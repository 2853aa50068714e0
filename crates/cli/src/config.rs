//! `autotable.toml` handling
//!
//! Values resolve in three layers: command-line flags, then the config
//! file, then built-in defaults.

use autotable_codegen::GeneratorConfig;
use autotable_core::{DatabaseType, EngineError, EngineResult};
use autotable_ir::DEFAULT_TAG_KEY;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "autotable.toml";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "migrations";

/// Contents of `autotable.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub tag_key: Option<String>,
    pub auto_id: Option<bool>,
    pub database: Option<DatabaseType>,
    pub overwrite: Option<bool>,
}

impl CliConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: CliConfig = toml::from_str(&text).map_err(|e| {
            EngineError::InvalidConfig(format!("{}: {}", path.display(), e.message()))
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load the explicit config file, or `autotable.toml` in `cwd` when
    /// present, or nothing.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> EngineResult<Self> {
        match explicit {
            Some(path) => Self::load(&cwd.join(path)),
            None => {
                let path = cwd.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub tag_key: Option<String>,
    pub no_auto_id: bool,
    pub force: bool,
}

/// Fully resolved settings of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: PathBuf,
    pub output: PathBuf,
    pub tag_key: String,
    pub auto_id: bool,
    pub database: DatabaseType,
    pub overwrite: bool,
}

impl Settings {
    /// Merge flags over the config file over defaults.
    ///
    /// Relative paths are resolved against `cwd`.
    pub fn resolve(config: &CliConfig, overrides: &Overrides, cwd: &Path) -> Self {
        let source = overrides
            .source
            .clone()
            .or_else(|| config.source.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let output = overrides
            .output
            .clone()
            .or_else(|| config.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Self {
            source: crate::input::resolve_source(&source, cwd),
            output: crate::input::resolve_source(&output, cwd),
            tag_key: overrides
                .tag_key
                .clone()
                .or_else(|| config.tag_key.clone())
                .unwrap_or_else(|| DEFAULT_TAG_KEY.to_string()),
            auto_id: !overrides.no_auto_id && config.auto_id.unwrap_or(true),
            database: config.database.unwrap_or_default(),
            overwrite: overrides.force || config.overwrite.unwrap_or(false),
        }
    }

    /// Generator configuration for these settings
    pub fn generator_config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::new()
            .with_output_dir(&self.output)
            .with_tag_key(&self.tag_key)
            .with_database(self.database);
        if !self.auto_id {
            config = config.without_auto_id();
        }
        if self.overwrite {
            config = config.allow_overwrite();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, CliConfig::default());

        let settings = Settings::resolve(&config, &Overrides::default(), dir.path());
        assert_eq!(settings.source, dir.path().join("."));
        assert_eq!(settings.output, dir.path().join("migrations"));
        assert_eq!(settings.tag_key, "autoTable");
        assert!(settings.auto_id);
        assert!(!settings.overwrite);
    }

    #[test]
    fn test_load_from_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "source = \"models\"\ntag_key = \"db\"\nauto_id = false\ndatabase = \"mariadb\"\n",
        )
        .unwrap();

        let config = CliConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.source, Some(PathBuf::from("models")));
        assert_eq!(config.database, Some(DatabaseType::MySQL));

        let settings = Settings::resolve(&config, &Overrides::default(), dir.path());
        assert_eq!(settings.source, dir.path().join("models"));
        assert_eq!(settings.tag_key, "db");
        assert!(!settings.auto_id);
    }

    #[test]
    fn test_flags_override_file() {
        let config = CliConfig {
            source: Some("models".into()),
            tag_key: Some("db".into()),
            overwrite: Some(false),
            ..Default::default()
        };
        let overrides = Overrides {
            source: Some("/abs/schemas".into()),
            tag_key: Some("sql".into()),
            force: true,
            ..Default::default()
        };

        let settings = Settings::resolve(&config, &overrides, Path::new("/work"));
        assert_eq!(settings.source, PathBuf::from("/abs/schemas"));
        assert_eq!(settings.tag_key, "sql");
        assert!(settings.overwrite);

        let generator = settings.generator_config();
        assert_eq!(generator.tag_key, "sql");
        assert!(generator.overwrite);
        assert_eq!(generator.output_dir, PathBuf::from("/work/migrations"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "sauce = \"models\"\n").unwrap();

        let err = CliConfig::discover(Some(&path), dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = CliConfig::discover(Some(Path::new("nope.toml")), dir.path()).unwrap_err();
        assert!(err.is_io());
    }
}
