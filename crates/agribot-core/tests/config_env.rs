// Runs in its own test binary: it mutates process environment variables.
use agribot_core::config::Config;
use tempfile::TempDir;

#[test]
fn app_env_vars_override_files() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "[matching]\nthreshold = 0.3\n").unwrap();
    std::env::set_var("APP_MATCHING__THRESHOLD", "0.45");
    std::env::set_var("APP_CHAT__DEFAULT_LANGUAGE", "br");

    let settings = Config::load_for_env(tmp.path(), "test").expect("config").settings().expect("settings");
    assert!((settings.matching.threshold - 0.45).abs() < 1e-12);
    assert_eq!(settings.chat.default_language, "br");

    std::env::remove_var("APP_MATCHING__THRESHOLD");
    std::env::remove_var("APP_CHAT__DEFAULT_LANGUAGE");
}
