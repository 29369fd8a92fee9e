// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writer index: MIME type -> writers in descending priority.
//!
//! Priorities come from an explicit value or the preferred-order table.
//! Finite penalty overrides do not reorder writers; an infinite one hides a
//! writer from `writer_for` and `writers_for`.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use capreg_core::{CapabilityKey, CapabilityKind, CapregError, ImageWriter, Implementation};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::penalty_table::PenaltyTable;
use crate::preferred::PreferredOrder;
use crate::ranking::RankedEntry;

#[derive(Clone)]
struct WriterEntry {
    entry: RankedEntry<dyn ImageWriter>,
    priority: i32,
    explicit: bool,
}

/// Writers grouped by MIME type.
pub struct WriterIndex {
    penalties: Arc<PenaltyTable>,
    preferred: ArcSwap<PreferredOrder>,
    buckets: RwLock<HashMap<String, Vec<WriterEntry>>>,
}

impl WriterIndex {
    pub fn new(penalties: Arc<PenaltyTable>, preferred: PreferredOrder) -> Self {
        Self {
            penalties,
            preferred: ArcSwap::from_pointee(preferred),
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `writer` with the priority the preferred-order table gives its identity.
    pub fn register(&self, writer: Arc<dyn ImageWriter>) -> Result<bool, CapregError> {
        self.insert(writer, None)
    }

    /// Registers `writer` with a fixed priority that preferred-order changes won't touch.
    pub fn register_with_priority(&self, writer: Arc<dyn ImageWriter>, priority: i32) -> Result<bool, CapregError> {
        self.insert(writer, Some(priority))
    }

    /// Removes this exact instance from every bucket.
    pub fn unregister(&self, writer: &Arc<dyn ImageWriter>) -> bool {
        let mut buckets = self.buckets.write();
        let mut removed = false;
        buckets.retain(|mime_type, bucket| {
            let before = bucket.len();
            bucket.retain(|w| !w.entry.is(writer));
            if bucket.len() < before {
                removed = true;
                debug!(identity = writer.identity(), mime_type = mime_type.as_str(), "unregistered writer");
            }
            !bucket.is_empty()
        });
        removed
    }

    /// The highest-priority writer for `mime_type` that reports itself functional.
    ///
    /// The bucket is copied under the read lock; `is_functional` runs after
    /// the lock is released.
    pub fn writer_for(&self, mime_type: &str) -> Option<Arc<dyn ImageWriter>> {
        self.writers_for(mime_type)
            .into_iter()
            .find(|writer| probe_functional(writer.as_ref()))
    }

    /// Every writer for `mime_type` in priority order, without probing.
    pub fn writers_for(&self, mime_type: &str) -> Vec<Arc<dyn ImageWriter>> {
        let candidates: Vec<WriterEntry> = {
            let buckets = self.buckets.read();
            match buckets.get(mime_type) {
                Some(bucket) => bucket.clone(),
                None => return Vec::new(),
            }
        };
        candidates
            .into_iter()
            .map(|w| Arc::clone(w.entry.implementation()))
            .filter(|writer| !self.penalties.get(writer.identity()).is_infinite())
            .collect()
    }

    /// Priority a writer is currently sorted by, if registered for `mime_type`.
    pub fn priority_of(&self, writer: &Arc<dyn ImageWriter>, mime_type: &str) -> Option<i32> {
        self.buckets
            .read()
            .get(mime_type)?
            .iter()
            .find(|w| w.entry.is(writer))
            .map(|w| w.priority)
    }

    pub fn preferred_order(&self) -> Arc<PreferredOrder> {
        self.preferred.load_full()
    }

    /// Swaps in a new preferred-order table.
    ///
    /// Writers registered without an explicit priority are re-resolved
    /// against the new table and every bucket is re-sorted. Equal priorities
    /// keep their registration order.
    pub fn replace_preferred_order(&self, order: PreferredOrder) {
        let mut buckets = self.buckets.write();
        info!(entries = order.len(), "replacing writer preferred order");
        self.preferred.store(Arc::new(order));
        let order = self.preferred.load();
        for bucket in buckets.values_mut() {
            for w in bucket.iter_mut().filter(|w| !w.explicit) {
                w.priority = order.priority_for(w.entry.implementation().identity());
            }
            bucket.sort_by_key(|w| (Reverse(w.priority), w.entry.sequence()));
        }
    }

    /// MIME types with at least one registered writer.
    pub fn mime_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.buckets.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Inserts `writer`; `None` resolves the priority from the preferred order.
    fn insert(&self, writer: Arc<dyn ImageWriter>, explicit_priority: Option<i32>) -> Result<bool, CapregError> {
        validate(writer.as_ref())?;
        let mime_type = writer.mime_type().to_string();

        // Resolved under the same lock `replace_preferred_order` swaps the table under.
        let mut buckets = self.buckets.write();
        let explicit = explicit_priority.is_some();
        let priority = explicit_priority
            .unwrap_or_else(|| self.preferred.load().priority_for(writer.identity()));
        let bucket = buckets.entry(mime_type.clone()).or_default();
        if bucket.iter().any(|w| w.entry.is(&writer)) {
            return Ok(false);
        }
        debug!(
            identity = writer.identity(),
            mime_type = mime_type.as_str(),
            priority,
            explicit,
            "registered writer"
        );
        // Before the first entry with strictly lower priority: equal priorities stay FIFO.
        let pos = bucket
            .iter()
            .position(|w| w.priority < priority)
            .unwrap_or(bucket.len());
        let key = CapabilityKey::for_type(mime_type);
        bucket.insert(
            pos,
            WriterEntry {
                entry: RankedEntry::new(writer, Some(key)),
                priority,
                explicit,
            },
        );
        Ok(true)
    }
}

fn validate(writer: &dyn ImageWriter) -> Result<(), CapregError> {
    let reason = if writer.identity().trim().is_empty() {
        "identity must not be empty"
    } else if writer.mime_type().trim().is_empty() {
        "MIME type must not be empty"
    } else {
        return Ok(());
    };
    Err(CapregError::invalid_registration(
        CapabilityKind::Writer,
        writer.identity(),
        reason,
    ))
}

fn probe_functional(writer: &dyn ImageWriter) -> bool {
    match writer.is_functional() {
        Ok(functional) => functional,
        Err(err) => {
            warn!(identity = writer.identity(), error = %err, "writer functional probe failed");
            false
        }
    }
}
