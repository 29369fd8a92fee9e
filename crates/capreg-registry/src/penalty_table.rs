// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administrative penalty overrides keyed by implementation identity.
//!
//! Keys are identity strings rather than implementation handles, so an
//! override can be set before the implementation it targets is registered and
//! the table never keeps an implementation alive.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use capreg_core::Penalty;
use dashmap::DashMap;
use tracing::info;

/// Concurrent map of identity -> penalty, plus a generation counter.
///
/// Every `set` and `clear` bumps the generation. Indexes that cache a sort
/// order compare generations to know when the cache is stale; indexes that
/// rank per query read the table directly.
#[derive(Debug, Default)]
pub struct PenaltyTable {
    overrides: DashMap<String, Penalty>,
    generation: AtomicU64,
}

impl PenaltyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table from configured overrides.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Penalty)>,
        K: Into<String>,
    {
        let table = Self::new();
        for (identity, penalty) in entries {
            table.overrides.insert(identity.into(), penalty);
        }
        table
    }

    /// Sets the override for `identity`, replacing any previous value.
    pub fn set(&self, identity: impl Into<String>, penalty: Penalty) {
        let identity = identity.into();
        info!(identity = identity.as_str(), %penalty, "penalty override set");
        self.overrides.insert(identity, penalty);
        self.bump();
    }

    /// Removes the override for `identity`, returning the old value.
    pub fn clear(&self, identity: &str) -> Option<Penalty> {
        let removed = self.overrides.remove(identity).map(|(_, penalty)| penalty);
        if removed.is_some() {
            info!(identity, "penalty override cleared");
        }
        self.bump();
        removed
    }

    /// Returns the override for `identity`, [`Penalty::ZERO`] when unset.
    pub fn get(&self, identity: &str) -> Penalty {
        self.overrides
            .get(identity)
            .map(|entry| *entry.value())
            .unwrap_or(Penalty::ZERO)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Point-in-time copy of every override, sorted by identity.
    pub fn snapshot(&self) -> BTreeMap<String, Penalty> {
        self.overrides
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}
