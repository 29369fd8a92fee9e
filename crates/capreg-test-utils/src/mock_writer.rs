// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock image writer with a controllable `is_functional` probe.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use capreg_core::{CapregError, ImageWriter, Implementation};

/// A writer whose usability can be toggled at runtime.
pub struct MockWriter {
    identity: String,
    mime_type: String,
    functional: AtomicBool,
    failing: AtomicBool,
    probe_delay: Option<Duration>,
    probe_calls: AtomicUsize,
}

impl MockWriter {
    pub fn new(identity: &str, mime_type: &str) -> Self {
        Self {
            identity: identity.to_string(),
            mime_type: mime_type.to_string(),
            functional: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            probe_delay: None,
            probe_calls: AtomicUsize::new(0),
        }
    }

    pub fn non_functional(self) -> Self {
        self.functional.store(false, Ordering::SeqCst);
        self
    }

    /// Make `is_functional` return an error.
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// Sleep inside `is_functional`, simulating a slow native codec check.
    pub fn with_probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = Some(delay);
        self
    }

    pub fn set_functional(&self, functional: bool) {
        self.functional.store(functional, Ordering::SeqCst);
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Implementation for MockWriter {
    fn identity(&self) -> &str {
        &self.identity
    }
}

impl ImageWriter for MockWriter {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn is_functional(&self) -> Result<bool, CapregError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.probe_delay {
            std::thread::sleep(delay);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CapregError::probe(&self.identity, "codec check crashed"));
        }
        Ok(self.functional.load(Ordering::SeqCst))
    }
}
