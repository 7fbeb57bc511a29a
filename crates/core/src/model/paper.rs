use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::model::answer::Responses;
use crate::model::ids::PaperId;
use crate::model::question::Question;
use crate::time::truncate_to_seconds;

/// A paper listed for review in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: PaperId,
    pub title: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub local_pdf: Option<PathBuf>,
}

impl Paper {
    #[must_use]
    pub fn new(id: PaperId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            pdf_url: None,
            local_pdf: None,
        }
    }

    #[must_use]
    pub fn with_pdf_url(mut self, url: impl Into<String>) -> Self {
        self.pdf_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_local_pdf(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_pdf = Some(path.into());
        self
    }

    /// Remote PDF location, if one is configured and parses as a URL.
    #[must_use]
    pub fn remote_pdf(&self) -> Option<Url> {
        self.pdf_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| Url::parse(raw).ok())
    }

    #[must_use]
    pub fn local_pdf(&self) -> Option<&Path> {
        self.local_pdf
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// A question as captured in a saved record.
///
/// Entries that no longer parse as a [`Question`] (an unknown `type`, a
/// missing field) are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionSnapshot {
    Known(Question),
    Raw(serde_json::Value),
}

impl From<Question> for QuestionSnapshot {
    fn from(question: Question) -> Self {
        Self::Known(question)
    }
}

/// Persisted review state for one paper.
///
/// `completed` is a snapshot taken at save time and is not recomputed when
/// the catalog changes afterwards. Fields this crate does not know about are
/// kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(default)]
    pub paper_id: PaperId,
    #[serde(default)]
    pub paper_title: String,
    #[serde(default)]
    pub responses: Responses,
    #[serde(default)]
    pub questions: Vec<QuestionSnapshot>,
    #[serde(default, with = "crate::time::timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaperRecord {
    /// Build the record written by a save.
    ///
    /// The full response map is kept verbatim; only answered entries count
    /// toward `completed`.
    #[must_use]
    pub fn from_save(
        paper: &Paper,
        responses: Responses,
        questions: Vec<Question>,
        saved_at: DateTime<Utc>,
    ) -> Self {
        let completed = responses.answered().len() == questions.len();
        Self {
            paper_id: paper.id,
            paper_title: paper.title.clone(),
            responses,
            questions: questions.into_iter().map(QuestionSnapshot::from).collect(),
            timestamp: Some(truncate_to_seconds(saved_at)),
            completed,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.responses.answered_count()
    }
}
