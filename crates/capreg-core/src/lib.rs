// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the capreg capability registry.
//!
//! This crate provides the capability traits every pluggable implementation
//! implements, the error type, and the value types (flavors, capability keys,
//! penalties, scores) the registry indexes and ranks by.

pub mod error;
pub mod penalty;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CapregError;
pub use penalty::{Penalty, Score};
pub use types::{covers, CapabilityKey, CapabilityKind, Flavor, ImageDescriptor};

pub use traits::{Converter, ImageWriter, Implementation, LoaderFactory, Preloader};
