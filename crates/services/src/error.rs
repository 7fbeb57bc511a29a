//! Shared error types for the services crate.

use thiserror::Error;

use review_core::CatalogError;
use review_core::model::{AnswerError, QuestionId};
use storage::StorageError;

/// Errors emitted by `ResponseService` when applying reviewer input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResponseServiceError {
    #[error("question {0} is not in the catalog")]
    UnknownQuestion(QuestionId),
    #[error("invalid answer for question {id}: {source}")]
    InvalidAnswer {
        id: QuestionId,
        #[source]
        source: AnswerError,
    },
}

/// Errors emitted by `ExportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("no responses to export")]
    NothingToExport,
    #[error("failed to encode export: {0}")]
    Serialization(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors reading a configuration document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found")]
    Missing,
    #[error("failed to read config: {0}")]
    Io(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
