// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for capreg tests.
//!
//! Mock implementations of every capability trait with knobs for the cases
//! the registry must handle: unavailable factories, unsupported or failing
//! probes, non-functional writers, and probe call counting.
//!
//! # Components
//!
//! - [`MockPreloader`] - magic-byte sniffer with a fixed priority
//! - [`MockLoaderFactory`] - loader factory with configurable probe outcome
//! - [`MockConverter`] - flavor converter with a fixed penalty
//! - [`MockWriter`] - writer with a toggleable functional probe

pub mod fixtures;
pub mod mock_converter;
pub mod mock_loader;
pub mod mock_preloader;
pub mod mock_writer;

pub use mock_converter::MockConverter;
pub use mock_loader::{MockLoaderFactory, ProbeOutcome};
pub use mock_preloader::MockPreloader;
pub use mock_writer::MockWriter;
