//! Tests for application configuration loading.

use palaver::{BackendKind, ConfigErrorKind, LogFormat, PalaverConfig, PalaverErrorKind};
use std::io::Write;
use std::time::Duration;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_from_file_reads_all_tables() {
    let file = write_config(
        r#"
        [inference]
        backend = "bedrock"
        endpoint = "http://localhost:9000"
        timeout_secs = 5
        default_temperature = 0.3
        default_max_tokens = 256

        [inference.mock]
        text = "pong"
        delay_ms = 20

        [logging]
        format = "json"
        filter = "palaver=debug"
        "#,
    );

    let config = PalaverConfig::from_file(file.path()).expect("valid config");

    assert_eq!(config.inference.backend, BackendKind::Bedrock);
    assert_eq!(config.inference.endpoint, "http://localhost:9000");
    assert_eq!(config.inference.timeout(), Duration::from_secs(5));
    assert_eq!(config.inference.default_temperature, 0.3);
    assert_eq!(config.inference.default_max_tokens, 256);
    assert_eq!(config.inference.mock.text, "pong");
    assert_eq!(config.inference.mock.delay_ms, 20);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.filter, "palaver=debug");
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_config("");

    let config = PalaverConfig::from_file(file.path()).expect("valid config");

    assert_eq!(config, PalaverConfig::default());
    assert_eq!(config.inference.timeout_secs, 60);
    assert_eq!(config.logging.filter, "info");
}

#[test]
fn test_unknown_backend_in_file_is_config_error() {
    let file = write_config("[inference]\nbackend = \"carrier-pigeon\"\n");

    let err = PalaverConfig::from_file(file.path()).unwrap_err();

    assert!(matches!(err.kind(), PalaverErrorKind::Config(_)));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");

    let err = PalaverConfig::from_file(dir.path().join("absent.toml")).unwrap_err();

    let PalaverErrorKind::Config(config) = err.kind() else {
        panic!("expected config error, got {err}");
    };
    assert!(matches!(config.kind, ConfigErrorKind::Read(_)));
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_overrides_replace_file_values() {
    let file = write_config("[inference]\nbackend = \"mock\"\ntimeout_secs = 5\n");
    let mut config = PalaverConfig::from_file(file.path()).expect("valid config");

    config
        .apply_overrides(|key| match key {
            "PALAVER_BACKEND" => Some("Bedrock".to_string()),
            "PALAVER_ENDPOINT" => Some("http://127.0.0.1:1".to_string()),
            "PALAVER_API_KEY" => Some("secret".to_string()),
            "PALAVER_TIMEOUT_SECS" => Some("12".to_string()),
            _ => None,
        })
        .expect("valid overrides");

    assert_eq!(config.inference.backend, BackendKind::Bedrock);
    assert_eq!(config.inference.endpoint, "http://127.0.0.1:1");
    assert_eq!(config.inference.api_key.as_deref(), Some("secret"));
    assert_eq!(config.inference.timeout_secs, 12);
}

#[test]
fn test_invalid_overrides_are_config_errors() {
    let mut config = PalaverConfig::default();

    let backend = config
        .apply_overrides(|key| (key == "PALAVER_BACKEND").then(|| "pigeon".to_string()))
        .unwrap_err();
    assert!(matches!(backend.kind(), PalaverErrorKind::Config(_)));

    let timeout = config
        .apply_overrides(|key| (key == "PALAVER_TIMEOUT_SECS").then(|| "soon".to_string()))
        .unwrap_err();
    let PalaverErrorKind::Config(config) = timeout.kind() else {
        panic!("expected config error, got {timeout}");
    };
    assert_eq!(
        config.kind,
        ConfigErrorKind::InvalidValue {
            key: "PALAVER_TIMEOUT_SECS".to_string(),
            value: "soon".to_string(),
            expected: "whole seconds".to_string(),
        }
    );
}
