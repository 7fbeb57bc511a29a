//! Flattening category templates into an ordered, numbered question list.
//!
//! Ids come from one zero-based counter shared across all categories, so
//! adding, removing or reordering a template shifts every later id. They are
//! stable within a build and across builds of the same templates.

use thiserror::Error;

use crate::model::config::QuestionTemplates;
use crate::model::{
    DEFAULT_RATING_MAX, DEFAULT_RATING_MIN, Question, QuestionId, QuestionKind, QuestionTemplate,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Malformed question template. Positions are zero-based within the category.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("question {index} in category \"{category}\" has no text")]
    MissingText { category: String, index: usize },

    #[error("question {index} in category \"{category}\" has no type")]
    MissingType { category: String, index: usize },

    #[error("question {index} in category \"{category}\" has unknown type \"{kind}\"")]
    UnknownType {
        category: String,
        index: usize,
        kind: String,
    },

    #[error("multiple choice question {index} in category \"{category}\" has no options")]
    MissingOptions { category: String, index: usize },

    #[error("rating question {index} in category \"{category}\" has min {min} above max {max}")]
    InvalidRange {
        category: String,
        index: usize,
        min: i64,
        max: i64,
    },

    #[error("too many questions for one catalog")]
    TooManyQuestions,
}

//
// ─── BUILD ─────────────────────────────────────────────────────────────────────
//

/// Expand templates into questions, categories first, then template order.
///
/// # Errors
///
/// Returns the first `CatalogError` found; no partial catalog is produced.
pub fn build_catalog(templates: &QuestionTemplates) -> Result<Vec<Question>, CatalogError> {
    let mut questions = Vec::with_capacity(templates.values().map(Vec::len).sum());

    for (category, entries) in templates {
        for (index, template) in entries.iter().enumerate() {
            let id = u32::try_from(questions.len()).map_err(|_| CatalogError::TooManyQuestions)?;
            questions.push(build_question(QuestionId::new(id), category, index, template)?);
        }
    }

    Ok(questions)
}

fn build_question(
    id: QuestionId,
    category: &str,
    index: usize,
    template: &QuestionTemplate,
) -> Result<Question, CatalogError> {
    let text = template
        .text
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| CatalogError::MissingText {
            category: category.to_owned(),
            index,
        })?;

    let raw_kind = template
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .ok_or_else(|| CatalogError::MissingType {
            category: category.to_owned(),
            index,
        })?;
    let kind: QuestionKind = raw_kind.parse().map_err(|_| CatalogError::UnknownType {
        category: category.to_owned(),
        index,
        kind: raw_kind.to_owned(),
    })?;

    let options = template.options.clone().unwrap_or_default();
    let min = template.min.unwrap_or(DEFAULT_RATING_MIN);
    let max = template.max.unwrap_or(DEFAULT_RATING_MAX);

    match kind {
        QuestionKind::MultipleChoice if options.is_empty() => {
            return Err(CatalogError::MissingOptions {
                category: category.to_owned(),
                index,
            });
        }
        QuestionKind::Rating if min > max => {
            return Err(CatalogError::InvalidRange {
                category: category.to_owned(),
                index,
                min,
                max,
            });
        }
        _ => {}
    }

    Ok(Question::new(
        id,
        category.to_owned(),
        text.to_owned(),
        kind,
        options,
        min,
        max,
    ))
}

/// Split a catalog into `(category, questions)` groups in catalog order.
#[must_use]
pub fn group_by_category(questions: &[Question]) -> Vec<(&str, Vec<&Question>)> {
    let mut groups: Vec<(&str, Vec<&Question>)> = Vec::new();
    for question in questions {
        match groups
            .iter_mut()
            .find(|(category, _)| *category == question.category())
        {
            Some((_, members)) => members.push(question),
            None => groups.push((question.category(), vec![question])),
        }
    }
    groups
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
