use std::fs;

use tempfile::tempdir;
use zbb_config::{Config, ConfigError, ConfigManager};

#[test]
fn missing_config_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");

    let cfg = manager.load().expect("load config");
    assert_eq!(cfg, Config::default());
    assert_eq!(manager.data_dir(&cfg), dir.path().join("home").join("data"));
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let cfg = Config {
        currency: "EUR".to_string(),
        locale: "de-DE".to_string(),
        default_user: Some("alice".into()),
        log_filter: Some("zbb_budget=debug".into()),
        ..Config::default()
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resolve_user(), "alice");
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn config_without_optional_fields_uses_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "locale": "en-GB", "currency": "GBP" }"#).expect("write config");

    let loaded = ConfigManager::new(path).load().expect("load config");
    assert!(loaded.ui_color_enabled);
    assert_eq!(loaded.default_user, None);
    assert_eq!(loaded.resolve_user(), Config::DEFAULT_USER);
}

#[test]
fn malformed_config_is_reported() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "locale = en").expect("write config");
    assert!(matches!(
        ConfigManager::new(path.clone()).load(),
        Err(ConfigError::Serde(_))
    ));

    fs::write(&path, r#"{ "locale": "en-US", "currency": "dollars" }"#).expect("write config");
    assert!(matches!(
        ConfigManager::new(path).load(),
        Err(ConfigError::Invalid(_))
    ));
}
