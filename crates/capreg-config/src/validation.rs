// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates constraints serde cannot express: known log levels, well-formed
//! dotted identities, and a usable discovery queue size. Preferred-order
//! *values* are deliberately not checked here; an unparseable value falls
//! back to the default priority when it is resolved.

use crate::diagnostic::ConfigError;
use crate::model::RegistryConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every error instead of stopping at the first one.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for key in config.writers.preferred_order.keys() {
        if let Some(problem) = dotted_identity_problem(key) {
            errors.push(ConfigError::Validation {
                message: format!("writers.preferred_order key `{key}` {problem}"),
            });
        }
    }

    for identity in config.penalties.keys() {
        if let Some(problem) = dotted_identity_problem(identity) {
            errors.push(ConfigError::Validation {
                message: format!("penalties key `{identity}` {problem}"),
            });
        }
    }

    if config.discovery.channel_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "discovery.channel_capacity must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Describes what is wrong with a dotted identity or package prefix, if anything.
fn dotted_identity_problem(key: &str) -> Option<&'static str> {
    if key.trim().is_empty() {
        Some("must not be empty")
    } else if key.starts_with('.') || key.ends_with('.') {
        Some("must not start or end with `.`")
    } else if key.contains("..") {
        Some("must not contain an empty segment")
    } else if key.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else {
        None
    }
}
