//! Read-only knowledge store loaded from a JSON file.
//!
//! The file maps category names to ordered entry lists:
//!
//! ```json
//! { "Irrigation": [ { "translations": { "fr": { "question": "...", "answer": "..." } } } ] }
//! ```
//!
//! Category order and entry order follow the file, which keeps candidate
//! order, and therefore tie-breaking in the matcher, reproducible.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{Candidates, CategoryFilter, Entry, LanguageCode, LocalizedPair};

/// Number of quick questions offered per category by default.
pub const DEFAULT_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeStore {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct RawEntry {
    translations: BTreeMap<LanguageCode, LocalizedPair>,
}

impl KnowledgeStore {
    pub fn load(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| Error::data_load(&origin, e))?;
        let store = Self::parse(&origin, &text)?;
        info!(path = %origin, categories = store.categories.len(), entries = store.len(), "Loaded knowledge base");
        Ok(store)
    }

    pub fn from_json_str(text: &str) -> Result<Self> { Self::parse("<inline>", text) }

    fn parse(origin: &str, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::data_load(origin, e))?;
        let Value::Object(map) = value else {
            return Err(Error::data_load(origin, "top level must be an object mapping category names to entry lists"));
        };
        let mut categories = Vec::with_capacity(map.len());
        for (name, items) in map {
            let Value::Array(items) = items else {
                return Err(Error::data_load(origin, format!("category '{name}' is not a list of entries")));
            };
            let mut entries = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                let raw: RawEntry = serde_json::from_value(item)
                    .map_err(|e| Error::data_load(origin, format!("category '{name}', entry {i}: {e}")))?;
                entries.push(Entry { category: name.clone(), translations: raw.translations });
            }
            categories.push(Category { name, entries });
        }
        Ok(Self { categories })
    }

    /// Questions and answers eligible for `filter` in `language`, in
    /// category-then-entry order. Entries without that language are skipped.
    pub fn candidates(&self, filter: &CategoryFilter, language: &str) -> Result<Candidates> {
        let selected: Vec<&Category> = match filter {
            CategoryFilter::All => self.categories.iter().collect(),
            CategoryFilter::Named(name) => vec![self.require(name)?],
        };
        let candidates: Candidates = selected
            .into_iter()
            .flat_map(|c| c.entries.iter())
            .filter_map(|e| e.translation(language))
            .map(|p| (p.question.as_str(), p.answer.as_str()))
            .collect();
        debug!(category = %filter, language, candidates = candidates.len(), "Collected candidates");
        Ok(candidates)
    }

    /// First `limit` questions of a category available in `language`.
    pub fn suggestions(&self, category: &str, language: &str, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .require(category)?
            .entries
            .iter()
            .filter_map(|e| e.translation(language))
            .take(limit)
            .map(|p| p.question.clone())
            .collect())
    }

    pub fn category(&self, name: &str) -> Option<&Category> { self.categories.iter().find(|c| c.name == name) }

    pub fn has_category(&self, name: &str) -> bool { self.category(name).is_some() }

    pub fn categories(&self) -> impl Iterator<Item = &str> { self.categories.iter().map(|c| c.name.as_str()) }

    /// Every language code used by at least one entry, sorted.
    pub fn languages(&self) -> Vec<LanguageCode> {
        let set: BTreeSet<&String> = self
            .categories
            .iter()
            .flat_map(|c| c.entries.iter())
            .flat_map(|e| e.translations.keys())
            .collect();
        set.into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize { self.categories.iter().map(|c| c.entries.len()).sum() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn require(&self, name: &str) -> Result<&Category> {
        self.category(name).ok_or_else(|| Error::UnknownCategory(name.to_string()))
    }
}
