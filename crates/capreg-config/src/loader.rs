// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./capreg.toml` > `~/.config/capreg/capreg.toml` > `/etc/capreg/capreg.toml`
//! with environment variable overrides via `CAPREG_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RegistryConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/capreg/capreg.toml";
pub(crate) const LOCAL_CONFIG: &str = "capreg.toml";

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("capreg/capreg.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/capreg/capreg.toml` (system-wide)
/// 3. `~/.config/capreg/capreg.toml` (user XDG config)
/// 4. `./capreg.toml` (local directory)
/// 5. `CAPREG_*` environment variables
pub fn load_config() -> Result<RegistryConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and embedded configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RegistryConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RegistryConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RegistryConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading registry configuration");
    Figment::new()
        .merge(Serialized::defaults(RegistryConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RegistryConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider for the scalar sections.
///
/// Only `logging` and `discovery` are reachable from the environment: penalty
/// and preferred-order keys are dotted identities that an env var name cannot
/// carry unambiguously. Uses `Env::map()`, not `Env::split("_")`, so
/// `CAPREG_DISCOVERY_CHANNEL_CAPACITY` maps to `discovery.channel_capacity`.
fn env_provider() -> Env {
    Env::prefixed("CAPREG_")
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            key.starts_with("logging_") || key.starts_with("discovery_")
        })
        .map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("logging_", "logging.", 1)
                .replacen("discovery_", "discovery.", 1)
                .into()
        })
}
