//! Domain types shared by the store, the matcher and the chat layer.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Label selecting every category at once.
pub const ALL_CATEGORIES: &str = "ALL";

/// Minimum similarity a best candidate must strictly exceed.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

pub type LanguageCode = String;

/// A question and its answer in one language.
///
/// `reponse` is accepted as an alias for `answer` so knowledge files written
/// for the French-keyed layout still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedPair {
    pub question: String,
    #[serde(alias = "reponse")]
    pub answer: String,
}

/// One knowledge item.
///
/// - `category`: name of the group the entry was loaded under
/// - `translations`: per-language question/answer; languages may be missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub category: String,
    pub translations: BTreeMap<LanguageCode, LocalizedPair>,
}

impl Entry {
    pub fn translation(&self, language: &str) -> Option<&LocalizedPair> {
        self.translations.get(language)
    }
}

/// Category filter of a query: every category, or exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Exactly `ALL` selects every category; any other label names one.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORIES { Self::All } else { Self::Named(label.to_string()) }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    pub fn is_all(&self) -> bool { matches!(self, Self::All) }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::from_label(s)) }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self { Self::from_label(s) }
}

impl From<String> for CategoryFilter {
    fn from(s: String) -> Self {
        if s == ALL_CATEGORIES { Self::All } else { Self::Named(s) }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self { filter.as_str().to_string() }
}

/// Parallel, index-aligned questions and answers eligible for one query.
///
/// `questions()[i]` and `answers()[i]` always come from the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    questions: Vec<String>,
    answers: Vec<String>,
}

impl Candidates {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.questions.push(question.into());
        self.answers.push(answer.into());
    }

    pub fn questions(&self) -> &[String] { &self.questions }
    pub fn answers(&self) -> &[String] { &self.answers }
    pub fn answer(&self, index: usize) -> Option<&str> { self.answers.get(index).map(String::as_str) }
    pub fn len(&self) -> usize { self.questions.len() }
    pub fn is_empty(&self) -> bool { self.questions.is_empty() }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) { (self.questions, self.answers) }
}

impl<Q: Into<String>, A: Into<String>> FromIterator<(Q, A)> for Candidates {
    fn from_iter<I: IntoIterator<Item = (Q, A)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (q, a) in iter { out.push(q, a); }
        out
    }
}

impl Extend<(String, String)> for Candidates {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        for (q, a) in iter { self.push(q, a); }
    }
}

/// Outcome of matching one utterance against a candidate set.
///
/// The two misses are distinct on purpose: `NoCandidates` means the
/// language/category filter left nothing to compare, `BelowThreshold` means
/// candidates existed but none was close enough.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchResult {
    Matched { index: usize, score: f64, answer: String },
    NoCandidates,
    BelowThreshold { best_score: f64 },
}

impl MatchResult {
    pub fn matched(&self) -> bool { matches!(self, Self::Matched { .. }) }

    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Matched { answer, .. } => Some(answer),
            _ => None,
        }
    }

    /// Best similarity seen, when any candidate was scored.
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Matched { score, .. } => Some(*score),
            Self::BelowThreshold { best_score } => Some(*best_score),
            Self::NoCandidates => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self { Self { role: Role::User, content: content.into() } }
    pub fn assistant(content: impl Into<String>) -> Self { Self { role: Role::Assistant, content: content.into() } }
}

/// One saved snapshot of a conversation, as appended to the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub timestamp: DateTime<Local>,
    pub language: LanguageCode,
    pub category: CategoryFilter,
    pub messages: Vec<ChatMessage>,
}

impl ConversationRecord {
    pub fn now(language: impl Into<String>, category: CategoryFilter, messages: Vec<ChatMessage>) -> Self {
        Self { timestamp: Local::now(), language: language.into(), category, messages }
    }
}
