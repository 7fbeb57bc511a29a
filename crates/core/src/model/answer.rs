use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use crate::model::ids::QuestionKey;

//
// ─── ANSWER VALUE ──────────────────────────────────────────────────────────────
//

/// A single stored answer.
///
/// Free text and selected options are strings; ratings are integers. Any
/// other JSON value found in a stored document (`null`, a float rating, ...)
/// is kept verbatim as `Other` so reading it back never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl AnswerValue {
    /// An answer counts when its string form is non-empty after trimming.
    ///
    /// Whitespace-only text is kept in storage but never counts. Of the
    /// `Other` values, `null`, `false`, zero and empty containers never count.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        match self {
            AnswerValue::Number(_) => true,
            AnswerValue::Text(text) => !text.trim().is_empty(),
            AnswerValue::Other(value) => match value {
                Value::Null => false,
                Value::Bool(flag) => *flag,
                Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
                Value::String(text) => !text.trim().is_empty(),
                Value::Array(items) => !items.is_empty(),
                Value::Object(fields) => !fields.is_empty(),
            },
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) => write!(f, "{n}"),
            AnswerValue::Text(text) => f.write_str(text),
            AnswerValue::Other(Value::Null) => Ok(()),
            AnswerValue::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

/// Answers for one paper, keyed by canonical question key.
///
/// Keys that are not question keys at all are carried along untouched in a
/// separate map so a stored document survives a read/write cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Responses {
    entries: BTreeMap<QuestionKey, AnswerValue>,
    foreign: BTreeMap<String, AnswerValue>,
}

impl Responses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<QuestionKey>, value: impl Into<AnswerValue>) {
        self.entries.insert(key.into().canonical(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: impl Into<QuestionKey>) -> Option<&AnswerValue> {
        self.entries.get(&key.into())
    }

    #[must_use]
    pub fn contains_key(&self, key: impl Into<QuestionKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Stored entries, including ones under foreign keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len() + self.foreign.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.foreign.is_empty()
    }

    /// Number of stored entries whose value counts as answered.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries
            .values()
            .chain(self.foreign.values())
            .filter(|value| value.is_answered())
            .count()
    }

    /// Copy of this map holding only answered entries.
    #[must_use]
    pub fn answered(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(_, value)| value.is_answered())
                .map(|(key, value)| (*key, value.clone()))
                .collect(),
            foreign: self
                .foreign
                .iter()
                .filter(|(_, value)| value.is_answered())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Responses
where
    K: Into<QuestionKey>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut responses = Self::new();
        for (key, value) in iter {
            responses.insert(key, value);
        }
        responses
    }
}

impl Serialize for Responses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        for (key, value) in &self.foreign {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// Legacy bare-integer keys only fill slots the canonical `q_<id>` form left empty.
impl<'de> Deserialize<'de> for Responses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResponsesVisitor;

        impl<'de> Visitor<'de> for ResponsesVisitor {
            type Value = Responses;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of question keys to answers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = BTreeMap::new();
                let mut foreign = BTreeMap::new();
                while let Some((raw, value)) = access.next_entry::<String, AnswerValue>()? {
                    let Ok(key) = raw.parse::<QuestionKey>() else {
                        foreign.insert(raw, value);
                        continue;
                    };
                    match entries.entry(key.canonical()) {
                        Entry::Vacant(slot) => {
                            slot.insert((key.is_legacy(), value));
                        }
                        Entry::Occupied(mut slot) => {
                            if slot.get().0 || !key.is_legacy() {
                                slot.insert((key.is_legacy(), value));
                            }
                        }
                    }
                }
                Ok(Responses {
                    entries: entries
                        .into_iter()
                        .map(|(key, (_, value))| (key, value))
                        .collect(),
                    foreign,
                })
            }
        }

        deserializer.deserialize_map(ResponsesVisitor)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
