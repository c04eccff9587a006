//! Shared setup for the `agribot` binaries: flags, logging and wiring of
//! config, knowledge store, chat engine and history log.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agribot_chat::{ChatEngine, Session};
use agribot_core::config::{Config, Settings};
use agribot_core::types::{CategoryFilter, ALL_CATEGORIES};
use agribot_core::KnowledgeStore;
use agribot_history::ConversationLog;
use agribot_text::TfidfMatcher;

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory holding config.toml and config.<env>.toml
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,

    /// Knowledge base JSON file (overrides knowledge.path)
    #[arg(long)]
    pub knowledge: Option<PathBuf>,

    /// Language code, e.g. fr or br
    #[arg(long)]
    pub lang: Option<String>,

    /// Theme (category) name, or ALL
    #[arg(long)]
    pub theme: Option<String>,

    /// Minimum similarity a match must exceed
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Logs go to stderr so they never mix with answers. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads a theme typed by the user. A category of that exact name always
/// wins; otherwise `ALL` in any case and `Tous` select every category.
pub fn theme_filter(store: &KnowledgeStore, label: &str) -> CategoryFilter {
    let label = label.trim();
    if store.has_category(label) {
        CategoryFilter::Named(label.to_string())
    } else if label.eq_ignore_ascii_case(ALL_CATEGORIES) || label == "Tous" {
        CategoryFilter::All
    } else {
        CategoryFilter::Named(label.to_string())
    }
}

pub struct App {
    pub settings: Settings,
    pub engine: ChatEngine<TfidfMatcher>,
    pub history: Option<Arc<ConversationLog>>,
    pub session: Session,
}

pub fn build_app(args: &CommonArgs, with_history: bool) -> Result<App> {
    let config = Config::load_from(&args.config_dir).context("Error loading config")?;
    let mut settings = config.settings()?;
    if let Some(t) = args.threshold { settings.matching.threshold = t; }
    if let Some(lang) = &args.lang { settings.chat.default_language = lang.clone(); }
    settings.validate()?;

    let kb_path = args.knowledge.clone().unwrap_or_else(|| config.resolve(&settings.knowledge.path));
    let store = KnowledgeStore::load(&kb_path).context("Knowledge base could not be loaded")?;
    info!(path = %kb_path.display(), entries = store.len(), "Knowledge base ready");
    let mut engine = ChatEngine::from_settings(Arc::new(store), &settings);

    let history = if with_history && settings.history.enabled {
        let log = Arc::new(ConversationLog::open(config.resolve(&settings.history.path))?);
        engine = engine.with_sink(log.clone());
        Some(log)
    } else {
        None
    };

    let category = match args.theme.as_deref() {
        Some(label) => theme_filter(engine.store(), label),
        None => settings.chat.default_category.clone(),
    };
    let session = engine.session(category)?;
    Ok(App { settings, engine, history, session })
}
