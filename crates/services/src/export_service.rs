use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use review_core::model::{ResponseCollection, Responses};
use review_core::time::{FILE_STAMP_FORMAT, TIMESTAMP_FORMAT};
use storage::json::write_atomic;
use storage::{ResponseRepository, StorageError};

use crate::Clock;
use crate::error::ExportError;

/// Downloadable snapshot of every stored response.
///
/// `responses` is the stored document as written, without normalization.
#[derive(Clone, Debug, Serialize)]
pub struct ExportSnapshot {
    pub export_date: String,
    pub total_papers: usize,
    pub responses: Map<String, Value>,
    #[serde(skip)]
    taken_at: DateTime<Utc>,
}

impl ExportSnapshot {
    /// `research_responses_<YYYYMMDD_HHMMSS>.json`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "research_responses_{}.json",
            self.taken_at.format(FILE_STAMP_FORMAT)
        )
    }

    /// Pretty-printed document body.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Serialization` if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ExportError::Serialization(err.to_string()))
    }
}

/// What an export wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub papers: usize,
    pub answered: usize,
}

/// Builds and writes response exports for administrators.
#[derive(Clone)]
pub struct ExportService {
    clock: Clock,
    responses: Arc<dyn ResponseRepository>,
}

impl ExportService {
    #[must_use]
    pub fn new(clock: Clock, responses: Arc<dyn ResponseRepository>) -> Self {
        Self { clock, responses }
    }

    /// Wrap the collection as-is, with no filtering.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::NothingToExport` if the collection is empty.
    pub fn snapshot(&self, collection: &ResponseCollection) -> Result<ExportSnapshot, ExportError> {
        let document = serde_json::to_value(collection)
            .map_err(|err| ExportError::Serialization(err.to_string()))?;
        self.snapshot_document(document)
    }

    /// Wrap a stored document verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::NothingToExport` if the document holds no papers
    /// and `ExportError::Serialization` if it is not a JSON object.
    pub fn snapshot_document(&self, document: Value) -> Result<ExportSnapshot, ExportError> {
        let Value::Object(responses) = document else {
            return Err(ExportError::Serialization(
                "stored responses are not a JSON object".into(),
            ));
        };
        if responses.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let taken_at = self.clock.now();
        Ok(ExportSnapshot {
            export_date: taken_at.format(TIMESTAMP_FORMAT).to_string(),
            total_papers: responses.len(),
            responses,
            taken_at,
        })
    }

    /// Export the stored document into `dir`.
    ///
    /// A missing or unparsable document exports as empty, so nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::NothingToExport` when no paper has a record and
    /// `ExportError::Storage` if the file cannot be written.
    pub async fn export_to_dir(&self, dir: &Path) -> Result<ExportReport, ExportError> {
        let document = match self.responses.load_document().await {
            Ok(document) => document,
            Err(StorageError::NotFound) => Value::Object(Map::new()),
            Err(err) => {
                tracing::warn!(error = %err, "response document unusable, exporting nothing");
                Value::Object(Map::new())
            }
        };

        let snapshot = self.snapshot_document(document)?;
        let path = dir.join(snapshot.file_name());
        write_atomic(&path, snapshot.to_json_pretty()?.as_bytes()).await?;

        let report = ExportReport {
            path,
            papers: snapshot.total_papers,
            answered: answered_in(&snapshot.responses),
        };
        tracing::info!(
            path = %report.path.display(),
            papers = report.papers,
            answered = report.answered,
            "responses exported"
        );
        Ok(report)
    }
}

/// Answered entries across every record whose `responses` can be read.
fn answered_in(document: &Map<String, Value>) -> usize {
    document
        .values()
        .filter_map(|record| record.get("responses"))
        .filter_map(|responses| Responses::deserialize(responses).ok())
        .map(|responses| responses.answered_count())
        .sum()
}
