//! Tests for loading the suite configuration from disk.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::Write;
use std::time::Duration;

use cats_cli::application::ports::ConfigStore;
use cats_cli::infra::YamlConfigStore;
use tempfile::NamedTempFile;

fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_with_defaults_for_missing_keys() {
    let file = config_file(
        ".yaml",
        "api: api.example.com\napps_domain: apps.example.com\norg: o\nspace: s\nsleep_timeout: 60\n",
    );
    let store = YamlConfigStore::new(Some(file.path().to_path_buf()));
    let config = store.load().unwrap();
    assert_eq!(config.api, "api.example.com");
    assert_eq!(config.backend, "diego");
    assert_eq!(config.default_timeout, 30);
    assert_eq!(config.sleep_timeout_duration(), Duration::from_secs(60));
    assert!(config.validate().is_ok());
    assert_eq!(store.path().unwrap(), file.path());
}

#[test]
fn test_load_json_config() {
    let file = config_file(
        ".json",
        r#"{"api":"api.example.com","apps_domain":"apps.example.com","admin_user":"admin",
            "admin_password":"admin","org":"o","space":"s","skip_ssl_validation":true,
            "include_security_groups":false}"#,
    );
    let config = YamlConfigStore::new(Some(file.path().to_path_buf()))
        .load()
        .unwrap();
    assert!(config.skip_ssl_validation);
    assert!(!config.include_security_groups);
    assert!(config.include_routing);
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = YamlConfigStore::new(Some(path.clone())).load().unwrap_err();
    assert!(err.to_string().contains("does not exist"), "got: {err}");
    assert!(err.to_string().contains(&path.display().to_string()));
}

#[test]
fn test_malformed_file_names_path() {
    let file = config_file(".yaml", "api: [unclosed\n");
    let err = YamlConfigStore::new(Some(file.path().to_path_buf()))
        .load()
        .unwrap_err();
    assert!(
        err.to_string().starts_with("cannot parse"),
        "got: {err}"
    );
}

#[test]
fn test_wrong_type_is_a_parse_error() {
    let file = config_file(".yaml", "default_timeout: soon\n");
    assert!(
        YamlConfigStore::new(Some(file.path().to_path_buf()))
            .load()
            .is_err()
    );
}
