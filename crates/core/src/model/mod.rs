mod answer;
mod collection;
pub mod config;
mod ids;
mod paper;
mod question;

pub use answer::{AnswerValue, Responses};
pub use collection::ResponseCollection;
pub use config::{QuestionTemplates, ReviewConfig};
pub use ids::{PaperId, ParseIdError, QuestionId, QuestionKey};
pub use paper::{Paper, PaperRecord, QuestionSnapshot};
pub use question::{
    AnswerError, DEFAULT_RATING_MAX, DEFAULT_RATING_MIN, Question, QuestionKind, QuestionTemplate,
    UnknownKind,
};
