//! Comprehensive unit tests for config.rs module

use config::Map;
use line_artifacts::config::{AppConfig, OwnerConfig};
use line_artifacts::defaults::DefaultsProvider;
use line_artifacts::error::ArtifactError;
use line_artifacts::models::{Address, Recipients};
use tempfile::tempdir;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.source.root, None);
    assert_eq!(config.source.package_name, "jp.naver.line.android");
    assert_eq!(config.case.database_path, "case/line-artifacts.db");
    assert_eq!(config.owner, OwnerConfig::default());
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_config_validation_success() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_invalid_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "invalid".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_valid_log_levels() {
    let valid_levels = vec!["trace", "debug", "info", "warn", "error"];
    for level in valid_levels {
        let mut config = AppConfig::default();
        config.logging.level = level.to_string();
        assert!(config.validate().is_ok(), "Failed for level: {}", level);
    }
}

#[test]
fn test_config_validation_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_empty_package_name() {
    let mut config = AppConfig::default();
    config.source.package_name = "  ".to_string();
    assert!(matches!(config.validate(), Err(ArtifactError::InvalidConfig(_))));
}

#[test]
fn test_config_validation_empty_case_path() {
    let mut config = AppConfig::default();
    config.case.database_path = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_owner_name_without_id() {
    let mut config = AppConfig::default();
    config.owner.name = Some("Me".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_owner_defaults_resolve_missing_parties() {
    let mut config = AppConfig::default();
    config.owner = OwnerConfig {
        id: Some("u-owner".to_string()),
        name: Some("Me".to_string()),
    };

    let defaults = config.owner_defaults();
    let owner = Address::new("u-owner", "Me");
    assert_eq!(defaults.from_address(), Some(owner.clone()));
    assert_eq!(defaults.to_address(), Some(Recipients::Single(owner.clone())));
    assert_eq!(defaults.call_to_address(), Some(owner));
}

#[test]
fn test_load_from_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("analysis.toml");
    std::fs::write(
        &path,
        r#"
[source]
root = "/images/pixel"

[case]
database_path = "/cases/42/line.db"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = AppConfig::load_with_env(Some(&path), Some(Map::new())).unwrap();
    assert_eq!(config.source.root.as_deref(), Some("/images/pixel"));
    assert_eq!(config.source.package_name, "jp.naver.line.android");
    assert_eq!(config.case.database_path, "/cases/42/line.db");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_load_from_invalid_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[logging]\nformat = \"xml\"\n").unwrap();

    assert!(matches!(
        AppConfig::load_with_env(Some(&path), Some(Map::new())),
        Err(ArtifactError::InvalidConfig(_))
    ));
}

#[test]
fn test_load_without_owner_is_ok() {
    let config = AppConfig::load_with_env(None, Some(Map::new())).unwrap();

    assert_eq!(config.owner, OwnerConfig::default());
    assert_eq!(config.owner_defaults().from_address(), None);
    assert_eq!(config.case.database_path, "case/line-artifacts.db");
}

#[test]
fn test_file_without_owner_section_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-owner.toml");
    std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

    let config = AppConfig::load_with_env(Some(&path), Some(Map::new())).unwrap();
    assert_eq!(config.owner.id, None);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_load_owner_from_env() {
    let mut env = Map::new();
    env.insert("LINE_ARTIFACTS_OWNER__ID".to_string(), "u-env-owner".to_string());
    env.insert("LINE_ARTIFACTS_CASE__DATABASE_PATH".to_string(), "/cases/env.db".to_string());

    let config = AppConfig::load_with_env(None, Some(env)).unwrap();

    assert_eq!(config.owner.id.as_deref(), Some("u-env-owner"));
    assert_eq!(config.owner.name, None);
    assert_eq!(config.case.database_path, "/cases/env.db");
}

#[test]
fn test_env_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("analysis.toml");
    std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
    let mut env = Map::new();
    env.insert("LINE_ARTIFACTS_LOGGING__LEVEL".to_string(), "error".to_string());

    let config = AppConfig::load_with_env(Some(&path), Some(env)).unwrap();
    assert_eq!(config.logging.level, "error");
}
