// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the registry configuration system.

use capreg_config::diagnostic::ConfigError;
use capreg_config::model::{PriorityValue, RegistryConfig};
use capreg_config::{load_and_validate_str, load_config_from_str};
use capreg_core::Penalty;

/// Valid TOML with every section deserializes successfully.
#[test]
fn valid_toml_deserializes_into_registry_config() {
    let toml = r#"
[logging]
level = "debug"

[writers.preferred_order]
"org.acme.writer" = 10
"org.acme.writer.FastPng" = "25"

[penalties]
"org.acme.loader.SlowLoader" = 1000
"org.acme.loader.Broken" = "infinite"

[discovery]
channel_capacity = 8
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.writers.preferred_order.get("org.acme.writer"),
        Some(&PriorityValue::Number(10))
    );
    assert_eq!(
        config.writers.preferred_order.get("org.acme.writer.FastPng"),
        Some(&PriorityValue::Text("25".to_string()))
    );
    assert_eq!(
        config.penalties.get("org.acme.loader.SlowLoader"),
        Some(&Penalty::Finite(1000))
    );
    assert_eq!(
        config.penalties.get("org.acme.loader.Broken"),
        Some(&Penalty::Infinite)
    );
    assert_eq!(config.discovery.channel_capacity, 8);
}

/// User preferred-order entries are merged over the compiled defaults.
#[test]
fn preferred_order_merges_with_defaults() {
    let toml = r#"
[writers.preferred_order]
"org.acme.writer" = 10
"#;

    let config = load_config_from_str(toml).expect("should deserialize");
    assert_eq!(config.writers.preferred_order.len(), 3);
    assert!(config
        .writers
        .preferred_order
        .contains_key("org.example.writer.internal"));
}

/// Unknown field in [logging] produces an error naming the bad key.
#[test]
fn unknown_field_in_logging_produces_error() {
    let toml = r#"
[logging]
levl = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("levl"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown keys become UnknownKey diagnostics with a suggestion.
#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let toml = r#"
[discovery]
channel_capacty = 3
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "channel_capacity"
    )));
}

/// A penalty that is neither an integer nor "infinite" is rejected.
#[test]
fn bad_penalty_value_is_rejected() {
    let toml = r#"
[penalties]
"org.acme.loader.SlowLoader" = "lots"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .all(|e| !matches!(e, ConfigError::Validation { .. })));
}

/// An empty document yields the compiled defaults.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.discovery.channel_capacity, 64);
    assert!(config.penalties.is_empty());
    assert_eq!(
        config.writers.preferred_order.get("org.example.writer.imageio"),
        Some(&PriorityValue::Text("-1000".to_string()))
    );
}

/// Dot-notation overrides reach the scalar sections (the path the env provider uses).
#[test]
fn dotted_override_sets_channel_capacity() {
    use figment::{providers::Serialized, Figment};

    let config: RegistryConfig = Figment::new()
        .merge(Serialized::defaults(RegistryConfig::default()))
        .merge(("discovery.channel_capacity", 4))
        .merge(("logging.level", "warn"))
        .extract()
        .expect("should merge overrides");

    assert_eq!(config.discovery.channel_capacity, 4);
    assert_eq!(config.logging.level, "warn");
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: RegistryConfig = Figment::new()
        .merge(Serialized::defaults(RegistryConfig::default()))
        .merge(Toml::file("/nonexistent/path/capreg.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.logging.level, "info");
}

/// The default configuration survives a trip through TOML text.
#[test]
fn defaults_serialize_to_loadable_toml() {
    let mut config = RegistryConfig::default();
    config
        .penalties
        .insert("org.acme.loader.Broken".to_string(), Penalty::Infinite);

    let text = toml::to_string(&config).expect("config should serialize");
    let loaded = load_config_from_str(&text).expect("serialized config should load");
    assert_eq!(loaded.penalties, config.penalties);
    assert_eq!(loaded.writers.preferred_order, config.writers.preferred_order);
}

/// Validation runs after a successful load.
#[test]
fn validation_errors_surface_from_load_and_validate() {
    let toml = r#"
[discovery]
channel_capacity = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero capacity must fail");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}
