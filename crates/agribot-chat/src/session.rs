use agribot_core::types::{CategoryFilter, ChatMessage, ConversationRecord, LanguageCode};

/// Conversation state owned by the front end and passed into every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    language: LanguageCode,
    category: CategoryFilter,
    messages: Vec<ChatMessage>,
}

impl Session {
    pub fn new(language: impl Into<LanguageCode>, category: CategoryFilter) -> Self {
        Self { language: language.into(), category, messages: Vec::new() }
    }

    pub fn language(&self) -> &str { &self.language }
    pub fn category(&self) -> &CategoryFilter { &self.category }
    pub fn messages(&self) -> &[ChatMessage] { &self.messages }

    /// Switches language; the transcript is kept.
    pub fn set_language(&mut self, language: impl Into<LanguageCode>) { self.language = language.into(); }

    /// Unchecked; `ChatEngine::select_category` validates against the store.
    pub(crate) fn set_category(&mut self, category: CategoryFilter) { self.category = category; }

    pub(crate) fn push(&mut self, message: ChatMessage) { self.messages.push(message); }

    pub fn clear(&mut self) { self.messages.clear(); }

    /// Snapshot of the whole conversation for the history log.
    pub fn record(&self) -> ConversationRecord {
        ConversationRecord::now(self.language.clone(), self.category.clone(), self.messages.clone())
    }
}
