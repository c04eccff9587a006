//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_MATCHING__THRESHOLD=0.4`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against the configuration directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::types::{CategoryFilter, LanguageCode, DEFAULT_THRESHOLD};

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Loads from the current directory using `RUST_ENV` (default `dev`).
    pub fn load() -> anyhow::Result<Self> { Self::load_from(Path::new(".")) }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(dir, &env_name)
    }

    pub fn load_for_env(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: dir.to_path_buf() };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    pub fn base_dir(&self) -> &Path { &self.base_dir }

    /// Resolves a configured path against the configuration directory.
    pub fn resolve<S: AsRef<str>>(&self, p: S) -> PathBuf { resolve_with_base(&self.base_dir, p) }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        settings.validate()?;
        match env {
            "prod" | "production" => {
                let kb = self.resolve(&settings.knowledge.path);
                if !kb.is_file() {
                    return Err(Error::InvalidConfig(format!("knowledge base not found at {}", kb.display())).into());
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

/// Typed view of the configuration. Every section has defaults, so an empty
/// or missing `config.toml` is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub knowledge: KnowledgeSettings,
    pub matching: MatchingSettings,
    pub chat: ChatSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSettings {
    pub path: String,
}

impl Default for KnowledgeSettings {
    fn default() -> Self { Self { path: "data/connaissances.json".to_string() } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    pub threshold: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self { Self { threshold: DEFAULT_THRESHOLD } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub default_language: LanguageCode,
    pub default_category: CategoryFilter,
    /// Fallback texts keyed by language code.
    pub fallbacks: BTreeMap<LanguageCode, FallbackTexts>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            default_language: "fr".to_string(),
            default_category: CategoryFilter::All,
            fallbacks: BTreeMap::from([("fr".to_string(), FallbackTexts::default())]),
        }
    }
}

/// User-facing texts for the two kinds of miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackTexts {
    pub no_candidates: String,
    pub below_threshold: String,
}

impl Default for FallbackTexts {
    fn default() -> Self {
        Self {
            no_candidates: "Aucune donnée disponible pour ce thème.".to_string(),
            below_threshold: "Je ne sais pas répondre à cette question.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub enabled: bool,
    pub path: String,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { enabled: true, path: "conversation_history/historiques.jsonl".to_string() }
    }
}

impl Settings {
    pub fn validate(&self) -> crate::error::Result<()> {
        let t = self.matching.threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(Error::InvalidConfig(format!("matching.threshold must be within [0, 1], got {t}")));
        }
        if self.chat.default_language.trim().is_empty() {
            return Err(Error::InvalidConfig("chat.default_language must not be empty".to_string()));
        }
        if self.knowledge.path.trim().is_empty() {
            return Err(Error::InvalidConfig("knowledge.path must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert!((s.matching.threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(s.chat.default_language, "fr");
        assert!(s.chat.default_category.is_all());
        assert!(s.chat.fallbacks.contains_key("fr"));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut s = Settings::default();
        s.matching.threshold = 1.5;
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
        s.matching.threshold = f64::NAN;
        assert!(s.validate().is_err());
        s.matching.threshold = 0.0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn empty_language_is_rejected() {
        let mut s = Settings::default();
        s.chat.default_language = "  ".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let base = Path::new("/srv/agribot");
        assert_eq!(resolve_with_base(base, "data/kb.json"), PathBuf::from("/srv/agribot/data/kb.json"));
        assert_eq!(resolve_with_base(base, "/etc/kb.json"), PathBuf::from("/etc/kb.json"));
    }
}
