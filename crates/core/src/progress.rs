//! Live completion metrics, recomputed from the current responses.
//!
//! Unlike `PaperRecord::completed`, nothing here is stored.

use crate::model::{PaperRecord, Question, Responses};

/// Answered versus total questions for one paper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    /// In `[0, 1]`; zero when there are no questions.
    pub fraction: f64,
}

impl Progress {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }
}

/// Count answered responses against the catalog size.
///
/// Every answered entry counts, including keys that no longer match a
/// question in the catalog.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_progress(questions: &[Question], responses: &Responses) -> Progress {
    let answered = responses.answered_count();
    let total = questions.len();
    let fraction = if total == 0 {
        0.0
    } else {
        (answered as f64 / total as f64).min(1.0)
    };

    Progress {
        answered,
        total,
        fraction,
    }
}

/// Review state of a paper as shown in a paper listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl PaperStatus {
    /// Status from the saved record (if any) and the current catalog size.
    #[must_use]
    pub fn of(record: Option<&PaperRecord>, total_questions: usize) -> Self {
        let answered = record.map_or(0, PaperRecord::answered_count);
        if answered == 0 {
            Self::NotStarted
        } else if answered >= total_questions {
            Self::Complete
        } else {
            Self::InProgress
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PaperStatus::NotStarted => "not started",
            PaperStatus::InProgress => "in progress",
            PaperStatus::Complete => "complete",
        }
    }
}
