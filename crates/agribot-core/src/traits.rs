use crate::types::{Candidates, ConversationRecord, MatchResult};

/// Picks the single best answer for an utterance among index-aligned candidates.
pub trait Matcher: Send + Sync {
    fn best_match(&self, candidates: &Candidates, utterance: &str, threshold: f64) -> MatchResult;
}

/// Durable destination for conversation snapshots. Callers must not let a
/// failing sink interrupt the conversation.
pub trait ConversationSink: Send + Sync {
    fn append(&self, record: &ConversationRecord) -> anyhow::Result<()>;
}
