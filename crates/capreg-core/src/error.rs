// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the capability registry.

use thiserror::Error;

use crate::types::CapabilityKind;

/// The primary error type used across the registry crates.
///
/// Lookups never produce this error: an unsupported MIME type or flavor is an
/// ordinary `None`. Errors are reserved for broken registrations, failing
/// probes, and bad administrative input.
#[derive(Debug, Error)]
pub enum CapregError {
    /// Configuration errors (invalid TOML, bad values, unknown keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// A registration violated the calling contract (empty identity, empty
    /// MIME type, no flavors). Raised at the call site, never deferred.
    #[error("invalid {kind} registration for `{identity}`: {reason}")]
    InvalidRegistration {
        kind: CapabilityKind,
        identity: String,
        reason: String,
    },

    /// A caller-supplied probe (`is_supported`, `is_functional`) failed.
    ///
    /// Selection treats this as "candidate not usable" and moves on.
    #[error("probe failed for `{identity}`: {message}")]
    Probe { identity: String, message: String },

    /// A penalty value could not be parsed.
    #[error("invalid penalty: {0}")]
    InvalidPenalty(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CapregError {
    /// Shorthand for building an [`CapregError::InvalidRegistration`].
    pub fn invalid_registration(
        kind: CapabilityKind,
        identity: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRegistration {
            kind,
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for building a [`CapregError::Probe`].
    pub fn probe(identity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Probe {
            identity: identity.into(),
            message: message.into(),
        }
    }
}
