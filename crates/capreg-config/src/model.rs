// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the capability registry.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;
use std::fmt;

use capreg_core::Penalty;
use serde::{Deserialize, Serialize};

/// Top-level registry configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Log filtering for hosts that install a subscriber.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Writer ranking settings.
    #[serde(default)]
    pub writers: WriterConfig,

    /// Penalty overrides keyed by implementation identity.
    #[serde(default)]
    pub penalties: BTreeMap<String, Penalty>,

    /// Plugin discovery queue settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Writer registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WriterConfig {
    /// Identity or dotted package prefix -> priority. Higher priorities are
    /// preferred; unlisted writers get priority 0.
    #[serde(default = "default_preferred_order")]
    pub preferred_order: BTreeMap<String, PriorityValue>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            preferred_order: default_preferred_order(),
        }
    }
}

/// Built-in writers rank below anything a deployment adds.
fn default_preferred_order() -> BTreeMap<String, PriorityValue> {
    BTreeMap::from([
        (
            "org.example.writer.internal".to_string(),
            PriorityValue::Text("-2000".to_string()),
        ),
        (
            "org.example.writer.imageio".to_string(),
            PriorityValue::Text("-1000".to_string()),
        ),
    ])
}

/// A preferred-order value as written in configuration.
///
/// Accepted as either a TOML integer or a string. Strings are parsed when the
/// priority is resolved; a string that is not an integer falls back to the
/// default priority instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriorityValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for PriorityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityValue::Number(n) => write!(f, "{n}"),
            PriorityValue::Text(s) => f.write_str(s),
        }
    }
}

/// Discovery queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Capacity of the bounded channel between discovery and the registry.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    64
}
