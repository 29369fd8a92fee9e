// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock loader factory for deterministic selection tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use capreg_core::{CapregError, Flavor, ImageDescriptor, Implementation, LoaderFactory};
use parking_lot::Mutex;

/// What [`MockLoaderFactory::is_supported`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Supported,
    Unsupported,
    /// The probe itself errors.
    Fails,
}

/// A loader factory with a fixed set of MIME types and flavors.
pub struct MockLoaderFactory {
    identity: String,
    mime_types: Vec<String>,
    flavors: Vec<Flavor>,
    penalty: i32,
    flavor_penalties: HashMap<Flavor, i32>,
    available: bool,
    probe: Mutex<ProbeOutcome>,
    probe_calls: AtomicUsize,
}

impl MockLoaderFactory {
    pub fn new(identity: &str, mime_type: &str, flavors: &[Flavor]) -> Self {
        Self {
            identity: identity.to_string(),
            mime_types: vec![mime_type.to_string()],
            flavors: flavors.to_vec(),
            penalty: 0,
            flavor_penalties: HashMap::new(),
            available: true,
            probe: Mutex::new(ProbeOutcome::Supported),
            probe_calls: AtomicUsize::new(0),
        }
    }

    /// Usage penalty reported for every flavor without a specific one.
    pub fn with_penalty(mut self, penalty: i32) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_flavor_penalty(mut self, flavor: Flavor, penalty: i32) -> Self {
        self.flavor_penalties.insert(flavor, penalty);
        self
    }

    /// Also advertise `mime_type`, with the same flavors.
    pub fn with_mime_type(mut self, mime_type: &str) -> Self {
        self.mime_types.push(mime_type.to_string());
        self
    }

    pub fn with_probe(self, outcome: ProbeOutcome) -> Self {
        *self.probe.lock() = outcome;
        self
    }

    /// Report `is_available() == false`.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn set_probe(&self, outcome: ProbeOutcome) {
        *self.probe.lock() = outcome;
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Implementation for MockLoaderFactory {
    fn identity(&self) -> &str {
        &self.identity
    }
}

impl LoaderFactory for MockLoaderFactory {
    fn mime_types(&self) -> &[String] {
        &self.mime_types
    }

    fn flavors(&self, mime_type: &str) -> Vec<Flavor> {
        if self.mime_types.iter().any(|m| m == mime_type) {
            self.flavors.clone()
        } else {
            Vec::new()
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn is_supported(&self, _descriptor: &ImageDescriptor) -> Result<bool, CapregError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        match *self.probe.lock() {
            ProbeOutcome::Supported => Ok(true),
            ProbeOutcome::Unsupported => Ok(false),
            ProbeOutcome::Fails => Err(CapregError::probe(&self.identity, "mock probe failure")),
        }
    }

    fn usage_penalty(&self, flavor: &Flavor) -> i32 {
        self.flavor_penalties
            .get(flavor)
            .copied()
            .unwrap_or(self.penalty)
    }
}
