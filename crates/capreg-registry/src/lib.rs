// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime capability registry.
//!
//! Implementations of the capability traits in `capreg-core` register here
//! at runtime, and callers ask for the best implementation for a MIME type
//! and flavor. Ranking is intrinsic priority plus an administrative penalty
//! override; slow usability probes always run outside index locks.

pub mod converter;
pub mod discovery;
pub mod loader;
pub mod penalty_table;
pub mod preferred;
pub mod preloader;
pub mod ranking;
pub mod registry;
pub mod writer;

pub use converter::{ConverterList, ConverterSnapshot};
pub use discovery::{discovery_channel, run_discovery, DiscoveredImpl, DiscoveryEvent, DiscoveryListener};
pub use loader::LoaderIndex;
pub use penalty_table::PenaltyTable;
pub use preferred::PreferredOrder;
pub use preloader::PreloaderIndex;
pub use registry::CapabilityRegistry;
pub use writer::WriterIndex;
