use std::path::PathBuf;
use std::sync::Arc;

use review_core::model::{
    Paper, PaperId, PaperRecord, Question, QuestionId, ResponseCollection, Responses,
};
use review_core::time::FILE_STAMP_FORMAT;
use review_core::{Progress, compute_progress};
use storage::{ResponseRepository, StorageError};

use crate::Clock;
use crate::error::ResponseServiceError;

/// How the stored document looked when a session was opened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentState {
    /// Parsed successfully.
    Loaded,
    /// Nothing stored yet.
    Missing,
    /// Unreadable or unparsable; the session starts empty. An unparsable
    /// file is renamed first so the next save cannot overwrite it.
    Corrupt {
        reason: String,
        moved_to: Option<PathBuf>,
    },
}

/// Collection handed to a front end together with its load state.
#[derive(Clone, Debug)]
pub struct OpenedSession {
    pub collection: ResponseCollection,
    pub state: DocumentState,
}

/// Result of saving one paper's responses.
///
/// The in-memory collection always holds the new record; `persist_error`
/// reports a disk write that did not happen.
#[derive(Debug)]
pub struct SaveOutcome {
    pub record: PaperRecord,
    pub progress: Progress,
    pub persist_error: Option<StorageError>,
}

impl SaveOutcome {
    #[must_use]
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Saves and restores reviewer responses.
#[derive(Clone)]
pub struct ResponseService {
    clock: Clock,
    responses: Arc<dyn ResponseRepository>,
}

impl ResponseService {
    #[must_use]
    pub fn new(clock: Clock, responses: Arc<dyn ResponseRepository>) -> Self {
        Self { clock, responses }
    }

    /// Read the stored collection, falling back to an empty one.
    ///
    /// A missing document is the normal first-run case. A document that
    /// cannot be parsed is moved aside before the empty session is handed out;
    /// other read failures are only logged. Both are reported through
    /// `DocumentState::Corrupt`.
    pub async fn open_session(&self) -> OpenedSession {
        let err = match self.responses.load_collection().await {
            Ok(collection) => {
                return OpenedSession {
                    collection,
                    state: DocumentState::Loaded,
                };
            }
            Err(StorageError::NotFound) => {
                tracing::debug!("no response document yet, starting empty");
                return OpenedSession {
                    collection: ResponseCollection::new(),
                    state: DocumentState::Missing,
                };
            }
            Err(err) => err,
        };

        tracing::warn!(error = %err, "response document unusable, starting empty");
        let moved_to = match err {
            StorageError::Serialization(_) => {
                let suffix = self.clock.now().format(FILE_STAMP_FORMAT).to_string();
                match self.responses.set_aside(&suffix).await {
                    Ok(moved_to) => moved_to,
                    Err(move_err) => {
                        tracing::warn!(
                            error = %move_err,
                            "could not move response document aside"
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        OpenedSession {
            collection: ResponseCollection::new(),
            state: DocumentState::Corrupt {
                reason: err.to_string(),
                moved_to,
            },
        }
    }

    /// Stored responses for a paper.
    #[must_use]
    pub fn load(&self, session: &ResponseCollection, paper_id: PaperId) -> Responses {
        session.load(paper_id)
    }

    /// Overwrite the paper's record and write the whole collection.
    ///
    /// `responses` must be the full current set for the paper.
    pub async fn save(
        &self,
        session: &mut ResponseCollection,
        paper: &Paper,
        responses: Responses,
        questions: &[Question],
    ) -> SaveOutcome {
        let progress = compute_progress(questions, &responses);
        let record = session
            .save(paper, responses, questions.to_vec(), self.clock.now())
            .clone();

        let persist_error = match self.responses.persist_collection(session).await {
            Ok(()) => {
                tracing::debug!(
                    paper_id = %paper.id,
                    answered = progress.answered,
                    total = progress.total,
                    "responses saved"
                );
                None
            }
            Err(err) => {
                tracing::warn!(paper_id = %paper.id, error = %err, "responses kept in memory only");
                Some(err)
            }
        };

        SaveOutcome {
            record,
            progress,
            persist_error,
        }
    }

    /// Merge raw answers into the paper's current responses, then save.
    ///
    /// Every answer is validated before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `ResponseServiceError::UnknownQuestion` for ids outside the
    /// catalog and `ResponseServiceError::InvalidAnswer` for answers that do
    /// not fit their question.
    pub async fn apply_answers(
        &self,
        session: &mut ResponseCollection,
        paper: &Paper,
        questions: &[Question],
        answers: &[(QuestionId, String)],
    ) -> Result<SaveOutcome, ResponseServiceError> {
        let mut responses = session.load(paper.id);
        for (id, raw) in answers {
            let question = questions
                .iter()
                .find(|question| question.id() == *id)
                .ok_or(ResponseServiceError::UnknownQuestion(*id))?;
            let value = question
                .parse_answer(raw)
                .map_err(|source| ResponseServiceError::InvalidAnswer { id: *id, source })?;
            responses.insert(*id, value);
        }

        Ok(self.save(session, paper, responses, questions).await)
    }
}
