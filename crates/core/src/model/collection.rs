use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::model::answer::Responses;
use crate::model::ids::PaperId;
use crate::model::paper::{Paper, PaperRecord};
use crate::model::question::Question;

/// Every paper's saved review state, keyed by paper id.
///
/// This is both the session state a front end holds and the single document
/// written to disk. Saves replace a paper's record wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseCollection {
    records: BTreeMap<PaperId, PaperRecord>,
}

impl ResponseCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored responses for a paper, or an empty map if it was never saved.
    #[must_use]
    pub fn load(&self, paper_id: PaperId) -> Responses {
        self.records
            .get(&paper_id)
            .map(|record| record.responses.clone())
            .unwrap_or_default()
    }

    /// Replace the paper's record with the given responses and questions.
    ///
    /// Callers must pass the full current response set: keys left out are
    /// dropped from the stored record.
    pub fn save(
        &mut self,
        paper: &Paper,
        responses: Responses,
        questions: Vec<Question>,
        saved_at: DateTime<Utc>,
    ) -> &PaperRecord {
        let record = PaperRecord::from_save(paper, responses, questions, saved_at);
        self.records.insert(paper.id, record);
        &self.records[&paper.id]
    }

    #[must_use]
    pub fn record(&self, paper_id: PaperId) -> Option<&PaperRecord> {
        self.records.get(&paper_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending paper id order.
    pub fn iter(&self) -> impl Iterator<Item = &PaperRecord> {
        self.records.values()
    }

    /// Answered entries summed over every record.
    #[must_use]
    pub fn total_answered(&self) -> usize {
        self.records.values().map(PaperRecord::answered_count).sum()
    }
}

// The map key is authoritative for a record's paper id.
impl<'de> Deserialize<'de> for ResponseCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut records = BTreeMap::<PaperId, PaperRecord>::deserialize(deserializer)?;
        for (id, record) in &mut records {
            record.paper_id = *id;
        }
        Ok(Self { records })
    }
}
