use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::answer::AnswerValue;
use crate::model::ids::{QuestionId, QuestionKey};

pub const DEFAULT_RATING_MIN: i64 = 1;
pub const DEFAULT_RATING_MAX: i64 = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons an answer does not fit its question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("\"{value}\" is not one of the options: {options}")]
    UnknownOption { value: String, options: String },

    #[error("rating {value} is outside {min}..={max}")]
    RatingOutOfRange { value: i64, min: i64, max: i64 },

    #[error("rating must be a whole number, got \"{0}\"")]
    RatingNotANumber(String),

    #[error("text answers must be strings")]
    TextNotAString,
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// Widget kind a question is answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Text,
    MultipleChoice,
    Rating,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Text => "text",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::Rating => "rating",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for question type names outside the known set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown question type \"{0}\"")]
pub struct UnknownKind(pub String);

impl FromStr for QuestionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(Self::Text),
            "multiple_choice" => Ok(Self::MultipleChoice),
            "rating" => Ok(Self::Rating),
            other => Err(UnknownKind(other.to_owned())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One entry of a built catalog.
///
/// Built by [`crate::catalog::build_catalog`]; read back from saved paper
/// records as a snapshot. Every field is written for every kind, matching the
/// persisted document shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    category: String,
    text: String,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default = "default_min")]
    min: i64,
    #[serde(default = "default_max")]
    max: i64,
}

fn default_min() -> i64 {
    DEFAULT_RATING_MIN
}

fn default_max() -> i64 {
    DEFAULT_RATING_MAX
}

impl Question {
    pub(crate) fn new(
        id: QuestionId,
        category: String,
        text: String,
        kind: QuestionKind,
        options: Vec<String>,
        min: i64,
        max: i64,
    ) -> Self {
        Self {
            id,
            category,
            text,
            kind,
            options,
            min,
            max,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// Canonical response key for this question.
    #[must_use]
    pub fn key(&self) -> QuestionKey {
        QuestionKey::new(self.id)
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Check an answer against this question and normalize it.
    ///
    /// Ratings stored as digit strings are coerced to integers.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` if an option is not offered, a rating is out of
    /// range or not a number, or a text answer is not a string.
    pub fn validate_answer(&self, value: AnswerValue) -> Result<AnswerValue, AnswerError> {
        match self.kind {
            QuestionKind::Text => match value {
                AnswerValue::Text(_) => Ok(value),
                AnswerValue::Number(_) | AnswerValue::Other(_) => {
                    Err(AnswerError::TextNotAString)
                }
            },
            QuestionKind::MultipleChoice => {
                let raw = value.to_string();
                if self.options.iter().any(|option| *option == raw) {
                    Ok(AnswerValue::Text(raw))
                } else {
                    Err(AnswerError::UnknownOption {
                        value: raw,
                        options: self.options.join(", "),
                    })
                }
            }
            QuestionKind::Rating => {
                let rating = match value {
                    AnswerValue::Number(n) => n,
                    AnswerValue::Text(text) => text
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| AnswerError::RatingNotANumber(text.clone()))?,
                    AnswerValue::Other(other) => {
                        return Err(AnswerError::RatingNotANumber(other.to_string()));
                    }
                };
                if (self.min..=self.max).contains(&rating) {
                    Ok(AnswerValue::Number(rating))
                } else {
                    Err(AnswerError::RatingOutOfRange {
                        value: rating,
                        min: self.min,
                        max: self.max,
                    })
                }
            }
        }
    }

    /// Parse raw user input for this question.
    ///
    /// # Errors
    ///
    /// Same as [`Question::validate_answer`].
    pub fn parse_answer(&self, raw: &str) -> Result<AnswerValue, AnswerError> {
        self.validate_answer(AnswerValue::from(raw))
    }
}

//
// ─── TEMPLATE ──────────────────────────────────────────────────────────────────
//

/// Configuration entry a question is built from.
///
/// Every field is optional on the wire so that a malformed template surfaces
/// as a catalog error instead of a parse failure of the whole config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl QuestionTemplate {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            kind: Some(QuestionKind::Text.as_str().to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn multiple_choice<I, S>(text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: Some(text.into()),
            kind: Some(QuestionKind::MultipleChoice.as_str().to_owned()),
            options: Some(options.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rating(text: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            text: Some(text.into()),
            kind: Some(QuestionKind::Rating.as_str().to_owned()),
            min: Some(min),
            max: Some(max),
            ..Self::default()
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
