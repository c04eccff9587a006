use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use agribot_core::config::{FallbackTexts, Settings};
use agribot_core::knowledge::DEFAULT_SUGGESTIONS;
use agribot_core::traits::{ConversationSink, Matcher};
use agribot_core::types::{CategoryFilter, ChatMessage, LanguageCode, MatchResult, DEFAULT_THRESHOLD};
use agribot_core::{Error, KnowledgeStore, Result};
use agribot_text::TfidfMatcher;

use crate::session::Session;

/// Text shown to the user plus the typed outcome behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub result: MatchResult,
}

pub struct ChatEngine<M: Matcher> {
    store: Arc<KnowledgeStore>,
    matcher: M,
    threshold: f64,
    default_language: LanguageCode,
    fallbacks: BTreeMap<LanguageCode, FallbackTexts>,
    sink: Option<Arc<dyn ConversationSink>>,
}

impl ChatEngine<TfidfMatcher> {
    /// TF-IDF engine configured from settings.
    pub fn from_settings(store: Arc<KnowledgeStore>, settings: &Settings) -> Self {
        Self::new(store, TfidfMatcher::new())
            .with_threshold(settings.matching.threshold)
            .with_default_language(settings.chat.default_language.clone())
            .with_fallbacks(settings.chat.fallbacks.clone())
    }
}

impl<M: Matcher> ChatEngine<M> {
    pub fn new(store: Arc<KnowledgeStore>, matcher: M) -> Self {
        Self {
            store,
            matcher,
            threshold: DEFAULT_THRESHOLD,
            default_language: "fr".to_string(),
            fallbacks: BTreeMap::new(),
            sink: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self { self.threshold = threshold; self }

    pub fn with_default_language(mut self, language: impl Into<LanguageCode>) -> Self { self.default_language = language.into(); self }

    pub fn with_fallbacks(mut self, fallbacks: BTreeMap<LanguageCode, FallbackTexts>) -> Self { self.fallbacks = fallbacks; self }

    /// Every answered turn is also appended to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ConversationSink>) -> Self { self.sink = Some(sink); self }

    pub fn store(&self) -> &KnowledgeStore { &self.store }

    pub fn threshold(&self) -> f64 { self.threshold }

    /// A fresh session on the default language and the given category.
    pub fn session(&self, category: CategoryFilter) -> Result<Session> {
        self.check_category(&category)?;
        Ok(Session::new(self.default_language.clone(), category))
    }

    pub fn select_category(&self, session: &mut Session, category: CategoryFilter) -> Result<()> {
        self.check_category(&category)?;
        session.set_category(category);
        Ok(())
    }

    /// Matches one utterance against the session's language and category
    /// without touching the transcript.
    pub fn answer(&self, session: &Session, utterance: &str) -> Result<MatchResult> {
        let candidates = self.store.candidates(session.category(), session.language())?;
        Ok(self.matcher.best_match(&candidates, utterance, self.threshold))
    }

    /// Runs one typed turn: like [`reply`](Self::reply), then saves the
    /// conversation when a sink is configured.
    pub fn respond(&self, session: &mut Session, utterance: &str) -> Result<Reply> {
        let reply = self.reply(session, utterance)?;
        if self.sink.is_some() {
            if let Err(e) = self.save(session) { warn!("Failed to save conversation: {e:#}"); }
        }
        Ok(reply)
    }

    /// Records the user message, answers it and records the reply. Nothing is
    /// saved; quick questions go through here.
    pub fn reply(&self, session: &mut Session, utterance: &str) -> Result<Reply> {
        let result = self.answer(session, utterance)?;
        let text = self.reply_text(session.language(), &result);
        debug!(language = session.language(), category = %session.category(), matched = result.matched(), "Answered turn");
        session.push(ChatMessage::user(utterance));
        session.push(ChatMessage::assistant(text.clone()));
        Ok(Reply { text, result })
    }

    /// Appends the current conversation to the sink, if any.
    pub fn save(&self, session: &Session) -> anyhow::Result<()> {
        match &self.sink {
            Some(sink) => sink.append(&session.record()),
            None => Ok(()),
        }
    }

    /// Quick questions for the session's category; none when every category
    /// is selected.
    pub fn suggestions(&self, session: &Session) -> Result<Vec<String>> {
        match session.category() {
            CategoryFilter::All => Ok(Vec::new()),
            CategoryFilter::Named(name) => self.store.suggestions(name, session.language(), DEFAULT_SUGGESTIONS),
        }
    }

    /// User-facing text for a result in `language`, using the default
    /// language's fallbacks when `language` has none configured.
    pub fn reply_text(&self, language: &str, result: &MatchResult) -> String {
        let fallbacks = self
            .fallbacks
            .get(language)
            .or_else(|| self.fallbacks.get(&self.default_language))
            .cloned()
            .unwrap_or_default();
        match result {
            MatchResult::Matched { answer, .. } => answer.clone(),
            MatchResult::NoCandidates => fallbacks.no_candidates,
            MatchResult::BelowThreshold { .. } => fallbacks.below_threshold,
        }
    }

    fn check_category(&self, category: &CategoryFilter) -> Result<()> {
        match category {
            CategoryFilter::Named(name) if !self.store.has_category(name) => Err(Error::UnknownCategory(name.clone())),
            _ => Ok(()),
        }
    }
}
