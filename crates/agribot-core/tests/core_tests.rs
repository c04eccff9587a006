use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use agribot_core::config::Config;
use agribot_core::types::CategoryFilter;
use agribot_core::{Error, KnowledgeStore};

fn fixture() -> PathBuf {
    // crates/agribot-core -> crates -> repo root
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf();
    root.join("test_data/connaissances.json")
}

#[test]
fn load_fixture_knowledge_base() {
    let store = KnowledgeStore::load(&fixture()).expect("load");
    assert_eq!(store.categories().collect::<Vec<_>>(), vec!["Irrigation", "Sol", "Semences"]);
    assert_eq!(store.len(), 8);

    let fr = store.candidates(&CategoryFilter::All, "fr").expect("candidates");
    assert_eq!(fr.len(), 7, "one Bambara-only entry is skipped");
    assert_eq!(fr.answer(2), Some("Environ deux litres par plant tous les deux jours."));
}

#[test]
fn load_is_idempotent() {
    let a = KnowledgeStore::load(&fixture()).expect("first load");
    let b = KnowledgeStore::load(&fixture()).expect("second load");
    assert_eq!(a, b);
}

#[test]
fn missing_file_is_a_load_error() {
    let tmp = TempDir::new().unwrap();
    let err = KnowledgeStore::load(&tmp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::DataLoad { .. }), "{err}");
}

#[test]
fn malformed_file_is_a_load_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("kb.json");
    fs::write(&path, r#"{"Sol": [{"translations": {"fr": {"question": "q""#).unwrap();
    assert!(matches!(KnowledgeStore::load(&path), Err(Error::DataLoad { .. })));
}

#[test]
fn unknown_category_when_store_lacks_it() {
    let store = KnowledgeStore::from_json_str(
        r#"{"Sol": [{"translations": {"fr": {"question": "Comment enrichir le sol ?", "answer": "Compost."}}}]}"#,
    )
    .unwrap();
    let err = store.candidates(&CategoryFilter::Named("Irrigation".into()), "fr").unwrap_err();
    assert!(matches!(err, Error::UnknownCategory(_)));
}

#[test]
fn config_layers_env_file_over_base() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("config.toml"), "[matching]\nthreshold = 0.3\n[knowledge]\npath = \"kb.json\"\n").unwrap();
    fs::write(dir.join("config.test.toml"), "[matching]\nthreshold = 0.5\n").unwrap();

    let config = Config::load_for_env(dir, "test").expect("config");
    let settings = config.settings().expect("settings");
    assert!((settings.matching.threshold - 0.5).abs() < 1e-12);
    assert_eq!(settings.knowledge.path, "kb.json");
    assert_eq!(config.resolve(&settings.knowledge.path), dir.join("kb.json"));
    let lang: String = config.get("chat.default_language").expect("default language");
    assert_eq!(lang, "fr");
}

#[test]
fn config_without_files_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let settings = Config::load_for_env(tmp.path(), "dev").expect("config").settings().expect("settings");
    assert_eq!(settings.history.path, "conversation_history/historiques.jsonl");
    assert!(settings.history.enabled);
}

#[test]
fn config_rejects_invalid_threshold() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[matching]\nthreshold = 2.0\n").unwrap();
    assert!(Config::load_for_env(tmp.path(), "dev").is_err());
}

#[test]
fn prod_requires_existing_knowledge_base() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("config.toml"), "[knowledge]\npath = \"kb.json\"\n").unwrap();
    assert!(Config::load_for_env(dir, "prod").is_err());
    fs::write(dir.join("kb.json"), "{}").unwrap();
    assert!(Config::load_for_env(dir, "prod").is_ok());
}
