//! Unit tests for configuration and graceful degradation
//!
//! Covers:
//! - Missing or malformed TOML files fall back to defaults
//! - Root folder resolution priority (CLI > env > TOML > default)
//! - KPI settings overrides from TOML
//!
//! Tests that touch QCDASH_ROOT_FOLDER or QCDASH_CONFIG are marked #[serial]
//! so environment mutations never race.

use qcdash_common::config::{
    default_root_folder, resolve_root_folder, RootFolderInitializer, TomlConfig, CONFIG_FILE_ENV,
    DEFAULT_PORT, ROOT_FOLDER_ENV,
};
use qcdash_common::kpi::{DEFAULT_COMPLIANCE_CHANGE, DEFAULT_COMPLIANCE_TARGET};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
fn test_default_config_values() {
    let config = TomlConfig::default();

    assert!(config.root_folder.is_none());
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.kpi.compliance_change, DEFAULT_COMPLIANCE_CHANGE);
    assert_eq!(config.kpi.default_compliance_target, DEFAULT_COMPLIANCE_TARGET);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_partial_toml_overrides_only_given_keys() {
    let config = TomlConfig::from_toml_str(
        r#"
        port = 6000
        root_folder = "/srv/qcdash"

        [kpi]
        compliance_change = -2.5
        "#,
    )
    .unwrap();

    assert_eq!(config.port, 6000);
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/qcdash")));
    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.kpi.compliance_change, -2.5);
    assert_eq!(config.kpi.training_target, 95.0);
}

#[test]
fn test_malformed_toml_is_config_error() {
    let result = TomlConfig::from_toml_str("port = \"not a number\"");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Configuration error"));
}

#[test]
#[serial]
fn test_load_or_default_missing_file_uses_defaults() {
    env::remove_var(CONFIG_FILE_ENV);
    let config = TomlConfig::load_or_default(Some(Path::new("/nonexistent/qcdash/config.toml")));
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_load_or_default_reads_config_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 7001\n[logging]\nlevel = \"debug\"\n").unwrap();

    env::set_var(CONFIG_FILE_ENV, &path);
    let config = TomlConfig::load_or_default(None);
    env::remove_var(CONFIG_FILE_ENV);

    assert_eq!(config.port, 7001);
    assert_eq!(config.logging.level, "debug");
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(root, default_root_folder());
    assert!(!root.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_resolver_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/qcdash-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/qcdash-toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(Some(Path::new("/tmp/qcdash-cli")), &config);
    env::remove_var(ROOT_FOLDER_ENV);

    assert_eq!(root, PathBuf::from("/tmp/qcdash-cli"));
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/qcdash-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/qcdash-toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, &config);
    env::remove_var(ROOT_FOLDER_ENV);

    assert_eq!(root, PathBuf::from("/tmp/qcdash-env"));
}

#[test]
#[serial]
fn test_resolver_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/qcdash-toml")),
        ..Default::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/tmp/qcdash-toml"));
}

#[test]
fn test_initializer_creates_layout() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("root");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert!(initializer.documents_path().is_dir());
    assert_eq!(initializer.database_path(), root.join("qcdash.db"));

    // Second call on an existing layout is a no-op
    initializer.ensure_directory_exists().unwrap();
}
