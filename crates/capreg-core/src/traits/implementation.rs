// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every pluggable implementation.

/// Identity of a pluggable implementation.
///
/// The identity is a fully-qualified, dotted name such as
/// `org.example.image.loader.PngLoaderFactory`. Penalty overrides and
/// preferred-order priorities are keyed by it, so the registry never has to
/// keep an instance alive just to remember how to rank it.
pub trait Implementation: Send + Sync + 'static {
    fn identity(&self) -> &str;
}
