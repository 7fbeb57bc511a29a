use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use review_core::model::ReviewConfig;

use crate::error::ConfigError;

/// Default location of the paper and question configuration.
pub const DEFAULT_CONFIG_FILE: &str = "papers_config.json";

/// Where the active configuration came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at the path; built-in defaults in use.
    BuiltinMissing,
    /// The file could not be used; built-in defaults in use.
    BuiltinFallback(String),
}

#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: ReviewConfig,
    pub source: ConfigSource,
}

/// Reads the review configuration document.
#[derive(Clone, Debug)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict read of the config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if there is no file,
    /// `ConfigError::Io` if it cannot be read and `ConfigError::Parse` if it
    /// is not a valid config document.
    pub async fn read(&self) -> Result<ReviewConfig, ConfigError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => ConfigError::Missing,
                _ => ConfigError::Io(format!("{}: {err}", self.path.display())),
            })?;
        serde_json::from_str(&raw)
            .map_err(|err| ConfigError::Parse(format!("{}: {err}", self.path.display())))
    }

    /// Read the config file, falling back to `ReviewConfig::builtin()`.
    pub async fn load(&self) -> LoadedConfig {
        match self.read().await {
            Ok(config) => {
                tracing::debug!(
                    path = %self.path.display(),
                    papers = config.papers.len(),
                    "loaded review config"
                );
                LoadedConfig {
                    config,
                    source: ConfigSource::File(self.path.clone()),
                }
            }
            Err(ConfigError::Missing) => {
                tracing::debug!(path = %self.path.display(), "no config file, using built-in config");
                LoadedConfig {
                    config: ReviewConfig::builtin(),
                    source: ConfigSource::BuiltinMissing,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "config unusable, using built-in config");
                LoadedConfig {
                    config: ReviewConfig::builtin(),
                    source: ConfigSource::BuiltinFallback(err.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ConfigService::new(dir.path().join("absent.json")).load().await;
        assert_eq!(loaded.source, ConfigSource::BuiltinMissing);
        assert_eq!(loaded.config, ReviewConfig::builtin());
    }

    #[tokio::test]
    async fn invalid_file_falls_back_with_reason() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers_config.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let service = ConfigService::new(&path);
        assert!(matches!(service.read().await, Err(ConfigError::Parse(_))));
        let loaded = service.load().await;
        assert!(matches!(loaded.source, ConfigSource::BuiltinFallback(_)));
        assert_eq!(loaded.config.papers.len(), 3);
    }

    #[tokio::test]
    async fn file_config_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers_config.json");
        tokio::fs::write(
            &path,
            r#"{"papers": [{"id": 7, "title": "Seven"}],
                "question_templates": {"only": [{"text": "Q?", "type": "text"}]}}"#,
        )
        .await
        .unwrap();

        let loaded = ConfigService::new(&path).load().await;
        assert_eq!(loaded.source, ConfigSource::File(path));
        assert_eq!(loaded.config.papers.len(), 1);
        assert_eq!(loaded.config.catalog().unwrap().len(), 1);
    }
}
