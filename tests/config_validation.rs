//! Integration tests for configuration validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use multiaddr_core::config::{LoggingConfig, MultiaddrConfig, RegistryConfig};
use multiaddr_core::error::MultiaddrError;
use multiaddr_core::protocol::{ProtocolEntry, ValueFormat};
use std::io::Write;
use tracing::Level;

fn entry(code: u32, size: i32, name: &str) -> ProtocolEntry {
    ProtocolEntry {
        code,
        size,
        name: name.to_string(),
        resolvable: false,
        path: false,
        format: None,
        aliases: Vec::new(),
    }
}

#[test]
fn test_default_config_validates() {
    let config = MultiaddrConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
}

#[test]
fn test_empty_app_name() {
    let mut config = MultiaddrConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_app_name_too_long() {
    let config = MultiaddrConfig::default_with_overrides(|c| {
        c.logging.app_name = "x".repeat(65);
    });
    assert!(config.validate().iter().any(|e| e.contains("too long")));
}

#[test]
fn test_empty_protocol_table() {
    let config = MultiaddrConfig {
        registry: RegistryConfig {
            include_builtin: false,
            protocols: Vec::new(),
        },
        logging: LoggingConfig::default(),
    };
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Protocol table is empty")));
}

#[test]
fn test_duplicate_rows_in_table() {
    let mut config = MultiaddrConfig::default();
    config.registry.protocols = vec![entry(900, -1, "alpha"), entry(900, 0, "beta")];
    config.registry.protocols.push(entry(901, 0, "alpha"));

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Duplicate protocol code in table: 900")));
    assert!(errors.iter().any(|e| e.contains("Duplicate protocol name in table: 'alpha'")));
}

#[test]
fn test_collision_with_builtin_table() {
    let mut config = MultiaddrConfig::default();
    config.registry.protocols.push(entry(6, 16, "tcp-again"));

    let errors = config.validate();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].contains("code 6 already registered"));

    assert!(matches!(
        config.build_registry(),
        Err(MultiaddrError::DuplicateProtocol(_))
    ));
}

#[test]
fn test_invalid_rows() {
    let mut config = MultiaddrConfig::default();
    let mut path = entry(902, 32, "fixed-path");
    path.path = true;
    config.registry.protocols = vec![entry(903, 0, "bad/name"), entry(904, 0, ""), path];

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot contain '/'")));
    assert!(errors.iter().any(|e| e.contains("empty name")));
    assert!(errors.iter().any(|e| e.contains("must be variable-size")));
}

#[test]
fn test_validate_strict() {
    let mut config = MultiaddrConfig::default();
    assert!(config.validate_strict().is_ok());

    config.logging.app_name = String::new();
    match config.validate_strict() {
        Err(MultiaddrError::ConfigError(msg)) => {
            assert!(msg.contains("Configuration validation failed"))
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_toml_registry_without_builtin() {
    let config = MultiaddrConfig::from_toml(
        r#"
        [registry]
        include_builtin = false

        [[registry.protocols]]
        code = 4
        size = 32
        name = "ip4"

        [[registry.protocols]]
        code = 1000
        size = 64
        name = "tag"
        format = "hex"

        [logging]
        app_name = "edge"
        log_level = "debug"
        json_format = true
        "#,
    )
    .expect("valid TOML");

    assert!(config.validate().is_empty());
    assert_eq!(config.logging.log_level, Level::DEBUG);
    assert!(config.logging.json_format);

    let registry = config.build_registry().unwrap();
    assert_eq!(registry.len(), 2);
    assert!(registry.by_name("tcp").is_err());
    let tag = registry.by_code(1000).unwrap();
    assert_eq!(tag.format, ValueFormat::Hex);
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = MultiaddrConfig::from_toml(
        r#"
        [logging]
        app_name = "edge"
        log_level = "loud"
        json_format = false
        "#,
    );
    assert!(matches!(result, Err(MultiaddrError::ConfigError(_))));
}

#[test]
fn test_save_and_load_roundtrip() {
    let mut config = MultiaddrConfig::default();
    config.registry.protocols.push(entry(999, -1, "custom"));
    config.logging.log_level = Level::WARN;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    config.save_to_file(file.path()).unwrap();
    file.flush().unwrap();

    let loaded = MultiaddrConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded.registry.protocols, config.registry.protocols);
    assert_eq!(loaded.logging.log_level, Level::WARN);
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        MultiaddrConfig::from_file("/nonexistent/multiaddr.toml"),
        Err(MultiaddrError::ConfigError(_))
    ));
}

#[test]
fn test_example_config_is_valid() {
    let example = MultiaddrConfig::example_config();
    assert!(example.contains("[[registry.protocols]]"));
    let parsed = MultiaddrConfig::from_toml(&example).unwrap();
    assert!(parsed.validate().is_empty());
}

#[test]
fn test_value_format_must_match_size() {
    let with_format = |code: u32, size: i32, name: &str, format: ValueFormat| ProtocolEntry {
        format: Some(format),
        ..entry(code, size, name)
    };

    let mut config = MultiaddrConfig::default();
    config.registry.protocols = vec![
        with_format(910, -1, "blank", ValueFormat::None),
        with_format(911, 16, "addr4", ValueFormat::Ip4),
        with_format(912, 32, "label", ValueFormat::Text),
        with_format(913, 0, "digest", ValueFormat::Hex),
    ];
    let errors = config.validate();
    for name in ["blank", "addr4", "label", "digest"] {
        assert!(
            errors.iter().any(|e| e.contains(&format!("'{name}'"))),
            "{name} should be reported, got {errors:?}"
        );
    }
    assert!(config.build_registry().is_err());

    config.registry.protocols = vec![
        with_format(910, 0, "blank", ValueFormat::None),
        with_format(911, 32, "addr4", ValueFormat::Ip4),
        with_format(912, -1, "label", ValueFormat::Text),
        with_format(913, 0x100, "digest", ValueFormat::Hex),
    ];
    assert!(config.validate().is_empty(), "{:?}", config.validate());
}
