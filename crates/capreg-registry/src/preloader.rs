// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat, lazily sorted index of preloaders.
//!
//! Writes only bump a counter; the first read after a write (or after any
//! penalty change) re-sorts. A burst of registrations at startup therefore
//! costs one sort, not one per registration.

use std::sync::Arc;

use capreg_core::{CapabilityKind, CapregError, Implementation, Preloader};
use parking_lot::Mutex;
use tracing::debug;

use crate::penalty_table::PenaltyTable;
use crate::ranking::{score, RankedEntry};

/// What the entries were last sorted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortStamp {
    writes: u64,
    penalty_generation: u64,
}

struct PreloaderState {
    entries: Vec<RankedEntry<dyn Preloader>>,
    writes: u64,
    sorted: Option<SortStamp>,
}

/// Priority-sorted collection of every registered preloader.
pub struct PreloaderIndex {
    penalties: Arc<PenaltyTable>,
    state: Mutex<PreloaderState>,
}

impl PreloaderIndex {
    pub fn new(penalties: Arc<PenaltyTable>) -> Self {
        Self {
            penalties,
            state: Mutex::new(PreloaderState {
                entries: Vec::new(),
                writes: 0,
                sorted: None,
            }),
        }
    }

    /// Registers a preloader. Returns `Ok(false)` if this instance is already registered.
    pub fn register(&self, preloader: Arc<dyn Preloader>) -> Result<bool, CapregError> {
        if preloader.identity().trim().is_empty() {
            return Err(CapregError::invalid_registration(
                CapabilityKind::Preloader,
                preloader.identity(),
                "identity must not be empty",
            ));
        }

        let mut state = self.state.lock();
        if state.entries.iter().any(|e| e.is(&preloader)) {
            return Ok(false);
        }
        debug!(
            identity = preloader.identity(),
            priority = preloader.priority(),
            "registered preloader"
        );
        state.entries.push(RankedEntry::new(preloader, None));
        state.writes += 1;
        Ok(true)
    }

    /// Removes the entry holding this exact instance. Unknown instances are a no-op.
    pub fn unregister(&self, preloader: &Arc<dyn Preloader>) -> bool {
        let mut state = self.state.lock();
        let Some(pos) = state.entries.iter().position(|e| e.is(preloader)) else {
            return false;
        };
        state.entries.remove(pos);
        state.writes += 1;
        debug!(identity = preloader.identity(), "unregistered preloader");
        true
    }

    /// Preloaders in ranked order, excluding any with an infinite penalty.
    pub fn sorted(&self) -> Vec<Arc<dyn Preloader>> {
        let mut state = self.state.lock();
        self.ensure_sorted(&mut state);
        state
            .entries
            .iter()
            .filter(|e| !self.entry_score(e).is_excluded())
            .map(|e| Arc::clone(e.implementation()))
            .collect()
    }

    /// Every registered preloader in ranked order, excluded ones included.
    ///
    /// For administrative listings; selection must use [`Self::sorted`].
    pub fn entries(&self) -> Vec<Arc<dyn Preloader>> {
        let mut state = self.state.lock();
        self.ensure_sorted(&mut state);
        state
            .entries
            .iter()
            .map(|e| Arc::clone(e.implementation()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the next read will have to re-sort.
    pub fn is_dirty(&self) -> bool {
        let state = self.state.lock();
        state.sorted != Some(self.stamp(&state))
    }

    fn stamp(&self, state: &PreloaderState) -> SortStamp {
        SortStamp {
            writes: state.writes,
            penalty_generation: self.penalties.generation(),
        }
    }

    fn entry_score(&self, entry: &RankedEntry<dyn Preloader>) -> capreg_core::Score {
        let preloader = entry.implementation();
        score(preloader.priority(), preloader.identity(), &self.penalties)
    }

    fn ensure_sorted(&self, state: &mut PreloaderState) {
        // Stamp first: a penalty change racing the sort leaves the index dirty.
        let stamp = self.stamp(state);
        if state.sorted == Some(stamp) {
            return;
        }
        state
            .entries
            .sort_by_cached_key(|e| (self.entry_score(e), e.sequence()));
        state.sorted = Some(stamp);
        debug!(count = state.entries.len(), "re-sorted preloaders");
    }
}
