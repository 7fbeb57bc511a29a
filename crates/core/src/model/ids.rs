use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of a paper under review, as listed in the configuration.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaperId(u64);

impl PaperId {
    /// Creates a new `PaperId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Position of a question within one catalog build.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(u32);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// One-based number shown to reviewers (`Q1`, `Q2`, ...).
    #[must_use]
    pub fn display_number(&self) -> u64 {
        u64::from(self.0) + 1
    }
}

/// Key under which an answer is stored in a paper's response map.
///
/// The canonical written form is `q_<id>`. Bare integer keys from older
/// documents are accepted on read; `is_legacy` reports which form was parsed.
/// Equality and ordering only consider the question id.
#[derive(Clone, Copy)]
pub struct QuestionKey {
    id: QuestionId,
    legacy: bool,
}

const KEY_PREFIX: &str = "q_";

impl QuestionKey {
    #[must_use]
    pub fn new(id: QuestionId) -> Self {
        Self { id, legacy: false }
    }

    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.id
    }

    /// True when parsed from a bare integer key.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// The same key in canonical form.
    #[must_use]
    pub fn canonical(self) -> Self {
        Self::new(self.id)
    }
}

impl PartialEq for QuestionKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for QuestionKey {}

impl std::hash::Hash for QuestionKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for QuestionKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QuestionKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl From<QuestionId> for QuestionKey {
    fn from(id: QuestionId) -> Self {
        Self::new(id)
    }
}

impl fmt::Debug for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaperId({})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionKey({self})")
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEY_PREFIX}{}", self.id)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for PaperId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(PaperId::new)
            .map_err(|_| ParseIdError {
                kind: "PaperId".to_string(),
            })
    }
}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(QuestionId::new)
            .map_err(|_| ParseIdError {
                kind: "QuestionId".to_string(),
            })
    }
}

impl FromStr for QuestionKey {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (raw, legacy) = match s.strip_prefix(KEY_PREFIX) {
            Some(rest) => (rest, false),
            None => (s, true),
        };
        let id = raw
            .parse::<u32>()
            .map(QuestionId::new)
            .map_err(|_| ParseIdError {
                kind: "QuestionKey".to_string(),
            })?;
        Ok(Self { id, legacy })
    }
}

// ─── Serde ─────────────────────────────────────────────────────────────────────

impl Serialize for QuestionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for QuestionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
