use async_trait::async_trait;
use review_core::model::ResponseCollection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// No document has been written yet.
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Repository contract for the response document.
///
/// The whole collection is read and written as one unit; there is no
/// per-paper or per-answer write path.
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Read the stored collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing was stored yet,
    /// `StorageError::Serialization` if the stored document cannot be parsed,
    /// or other storage errors.
    async fn load_collection(&self) -> Result<ResponseCollection, StorageError>;

    /// Replace the stored collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be written.
    async fn persist_collection(&self, collection: &ResponseCollection) -> Result<(), StorageError>;

    /// Read the stored document as untyped JSON, exactly as written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing was stored yet,
    /// `StorageError::Serialization` if the document is not JSON,
    /// or other storage errors.
    async fn load_document(&self) -> Result<serde_json::Value, StorageError>;

    /// Move an unreadable document out of the way so the next write cannot
    /// replace it. Returns where it went, or `None` if there was nothing to move.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the document cannot be moved.
    async fn set_aside(&self, suffix: &str) -> Result<Option<PathBuf>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    collection: Arc<Mutex<Option<ResponseCollection>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collection: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ResponseRepository for InMemoryRepository {
    async fn load_collection(&self) -> Result<ResponseCollection, StorageError> {
        let guard = self
            .collection
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clone().ok_or(StorageError::NotFound)
    }

    async fn persist_collection(&self, collection: &ResponseCollection) -> Result<(), StorageError> {
        let mut guard = self
            .collection
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(collection.clone());
        Ok(())
    }

    async fn load_document(&self) -> Result<serde_json::Value, StorageError> {
        let collection = self.load_collection().await?;
        serde_json::to_value(&collection).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn set_aside(&self, _suffix: &str) -> Result<Option<PathBuf>, StorageError> {
        Ok(None)
    }
}

/// Repository handle behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub responses: Arc<dyn ResponseRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let responses: Arc<dyn ResponseRepository> = Arc::new(InMemoryRepository::new());
        Self { responses }
    }
}
