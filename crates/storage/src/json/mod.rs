use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use review_core::model::ResponseCollection;

use crate::repository::{ResponseRepository, Storage, StorageError};

mod atomic;

pub use atomic::write_atomic;

/// Default location of the response document, relative to the working directory.
pub const DEFAULT_RESPONSES_FILE: &str = "responses.json";

/// Response collection stored as one pretty-printed JSON document.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write never leaves a truncated document. There is no locking:
/// concurrent writers race and the last rename wins.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JsonFileRepository {
    async fn read_raw(&self) -> Result<String, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(raw),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(err) => Err(StorageError::Io(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl ResponseRepository for JsonFileRepository {
    async fn load_collection(&self) -> Result<ResponseCollection, StorageError> {
        let raw = self.read_raw().await?;
        let collection: ResponseCollection = serde_json::from_str(&raw).map_err(|err| {
            StorageError::Serialization(format!("{}: {err}", self.path.display()))
        })?;
        tracing::debug!(
            path = %self.path.display(),
            papers = collection.len(),
            "loaded response document"
        );
        Ok(collection)
    }

    async fn persist_collection(&self, collection: &ResponseCollection) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(collection)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        write_atomic(&self.path, data.as_bytes()).await?;
        tracing::debug!(
            path = %self.path.display(),
            papers = collection.len(),
            "persisted response document"
        );
        Ok(())
    }

    async fn load_document(&self) -> Result<serde_json::Value, StorageError> {
        let raw = self.read_raw().await?;
        serde_json::from_str(&raw).map_err(|err| {
            StorageError::Serialization(format!("{}: {err}", self.path.display()))
        })
    }

    async fn set_aside(&self, suffix: &str) -> Result<Option<PathBuf>, StorageError> {
        let mut target = self.path.clone().into_os_string();
        target.push(format!(".corrupt-{suffix}"));
        let target = PathBuf::from(target);

        match tokio::fs::rename(&self.path, &target).await {
            Ok(()) => {
                tracing::warn!(
                    from = %self.path.display(),
                    to = %target.display(),
                    "moved unreadable response document aside"
                );
                Ok(Some(target))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(format!(
                "failed to move {} aside: {err}",
                self.path.display()
            ))),
        }
    }
}

impl Storage {
    /// Build a `Storage` backed by a JSON document at `path`.
    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            responses: std::sync::Arc::new(JsonFileRepository::new(path)),
        }
    }
}
