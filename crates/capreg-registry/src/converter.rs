// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only converter list published as immutable snapshots.
//!
//! Readers load the current snapshot without locking. Writers serialize on a
//! mutex, build the next snapshot, and swap it in.

use std::ops::Deref;
use std::sync::Arc;

use arc_swap::ArcSwap;
use capreg_core::{CapabilityKind, CapregError, Converter, Implementation};
use parking_lot::Mutex;
use tracing::debug;

/// A point-in-time view of the registered converters, in registration order.
#[derive(Clone, Default)]
pub struct ConverterSnapshot {
    converters: Vec<Arc<dyn Converter>>,
    modifications: u64,
}

impl ConverterSnapshot {
    /// Modification count at the time this snapshot was published.
    pub fn modifications(&self) -> u64 {
        self.modifications
    }
}

impl Deref for ConverterSnapshot {
    type Target = [Arc<dyn Converter>];

    fn deref(&self) -> &Self::Target {
        &self.converters
    }
}

/// Registered converters plus a monotonic modification counter.
///
/// Caches built on top of the list (conversion pipelines, for instance)
/// remember the counter and rebuild when it moves.
pub struct ConverterList {
    write_lock: Mutex<()>,
    current: ArcSwap<ConverterSnapshot>,
}

impl Default for ConverterList {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterList {
    pub fn new() -> Self {
        Self {
            write_lock: Mutex::new(()),
            current: ArcSwap::from_pointee(ConverterSnapshot::default()),
        }
    }

    /// Appends `converter`. Returns `Ok(false)` if this instance is already listed.
    pub fn register(&self, converter: Arc<dyn Converter>) -> Result<bool, CapregError> {
        if converter.identity().trim().is_empty() {
            return Err(CapregError::invalid_registration(
                CapabilityKind::Converter,
                converter.identity(),
                "identity must not be empty",
            ));
        }

        let _guard = self.write_lock.lock();
        let current = self.current.load_full();
        if current.iter().any(|c| Arc::ptr_eq(c, &converter)) {
            return Ok(false);
        }
        let mut converters = current.converters.clone();
        debug!(
            identity = converter.identity(),
            target = %converter.target_flavor(),
            "registered converter"
        );
        converters.push(converter);
        self.current.store(Arc::new(ConverterSnapshot {
            converters,
            modifications: current.modifications + 1,
        }));
        Ok(true)
    }

    /// Removes this exact instance. The counter only moves if something was removed.
    pub fn unregister(&self, converter: &Arc<dyn Converter>) -> bool {
        let _guard = self.write_lock.lock();
        let current = self.current.load_full();
        let Some(pos) = current.iter().position(|c| Arc::ptr_eq(c, converter)) else {
            return false;
        };
        let mut converters = current.converters.clone();
        converters.remove(pos);
        self.current.store(Arc::new(ConverterSnapshot {
            converters,
            modifications: current.modifications + 1,
        }));
        debug!(identity = converter.identity(), "unregistered converter");
        true
    }

    /// The current list. Later registrations never alter a returned snapshot.
    pub fn snapshot(&self) -> Arc<ConverterSnapshot> {
        self.current.load_full()
    }

    pub fn modification_count(&self) -> u64 {
        self.current.load().modifications
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
