//! Validator configuration.
//!
//! Resolved in layers: built-in defaults, then an optional YAML file, then
//! environment variables, then command-line flags (applied by the CLI).

use std::path::{Path, PathBuf};

use mythos_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ValidatorConfig::corpus_root`].
pub const ENV_CORPUS_ROOT: &str = "MYTHOS_CORPUS_ROOT";
/// Environment variable overriding [`ValidatorConfig::reports_dir`].
pub const ENV_REPORTS_DIR: &str = "MYTHOS_REPORTS_DIR";

/// Settings for one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Root of the corpus: `<root>/<category>[/<tradition>]/<id>.json`.
    pub corpus_root: PathBuf,
    /// Directory the JSON report and text summary are written to.
    pub reports_dir: PathBuf,
    /// Structured-data file extension, without the dot.
    pub extension: String,
    /// Files whose name starts with this prefix are rollups, not entities.
    pub excluded_prefix: String,
    /// Parse files and validate documents on the rayon pool.
    pub parallel: bool,
    /// Cap for broken links, format issues, schema violations and warnings
    /// listed in the report.
    pub example_limit: usize,
    /// Cap for invalid URLs and invalid search metadata listed in the report.
    pub secondary_example_limit: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("firebase-assets-enhanced"),
            reports_dir: PathBuf::from("reports"),
            extension: "json".to_string(),
            excluded_prefix: "_".to_string(),
            parallel: true,
            example_limit: 100,
            secondary_example_limit: 50,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MYTHOS_CORPUS_ROOT` / `MYTHOS_REPORTS_DIR` from the process
    /// environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root) = lookup(ENV_CORPUS_ROOT).filter(|v| !v.is_empty()) {
            self.corpus_root = PathBuf::from(root);
        }
        if let Some(dir) = lookup(ENV_REPORTS_DIR).filter(|v| !v.is_empty()) {
            self.reports_dir = PathBuf::from(dir);
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ConfigError::Invalid {
                key: "extension".to_string(),
                reason: format!("expected a bare extension like \"json\", got {:?}", self.extension),
            });
        }
        if self.example_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "exampleLimit".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.secondary_example_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "secondaryExampleLimit".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ValidatorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.extension, "json");
        assert_eq!(config.excluded_prefix, "_");
        assert!(config.parallel);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mythos.yaml");
        std::fs::write(&path, "corpusRoot: /data/corpus\nexampleLimit: 10\n").unwrap();

        let config = ValidatorConfig::from_file(&path).unwrap();
        assert_eq!(config.corpus_root, PathBuf::from("/data/corpus"));
        assert_eq!(config.example_limit, 10);
        assert_eq!(config.reports_dir, PathBuf::from("reports"));
        assert_eq!(config.secondary_example_limit, 50);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mythos.yaml");
        std::fs::write(&path, "corpusRoots: /typo\n").unwrap();
        assert!(matches!(
            ValidatorConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ValidatorConfig::from_file(Path::new("/nonexistent/mythos.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn zero_limit_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mythos.yaml");
        std::fs::write(&path, "exampleLimit: 0\n").unwrap();
        let err = ValidatorConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("exampleLimit"));
    }

    #[test]
    fn dotted_extension_is_invalid() {
        let config = ValidatorConfig {
            extension: ".json".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_replace_paths() {
        let mut config = ValidatorConfig::default();
        config.apply_overrides(|key| match key {
            ENV_CORPUS_ROOT => Some("/srv/corpus".to_string()),
            ENV_REPORTS_DIR => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.corpus_root, PathBuf::from("/srv/corpus"));
        assert_eq!(config.reports_dir, PathBuf::from("reports"));
    }
}
