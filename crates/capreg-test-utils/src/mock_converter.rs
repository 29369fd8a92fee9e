// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use capreg_core::{Converter, Flavor, Implementation};

/// A converter between fixed flavors.
pub struct MockConverter {
    identity: String,
    sources: Vec<Flavor>,
    target: Flavor,
    penalty: i32,
}

impl MockConverter {
    pub fn new(identity: &str, sources: &[Flavor], target: Flavor) -> Self {
        Self {
            identity: identity.to_string(),
            sources: sources.to_vec(),
            target,
            penalty: 10,
        }
    }

    pub fn with_penalty(mut self, penalty: i32) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn shared(self) -> Arc<dyn Converter> {
        Arc::new(self)
    }
}

impl Implementation for MockConverter {
    fn identity(&self) -> &str {
        &self.identity
    }
}

impl Converter for MockConverter {
    fn source_flavors(&self) -> Vec<Flavor> {
        self.sources.clone()
    }

    fn target_flavor(&self) -> Flavor {
        self.target.clone()
    }

    fn conversion_penalty(&self) -> i32 {
        self.penalty
    }
}
