// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use capreg_core::{ImageDescriptor, Implementation, Preloader};

/// A preloader that recognizes resources starting with a magic byte sequence.
pub struct MockPreloader {
    identity: String,
    priority: i32,
    magic: Vec<u8>,
    mime_type: String,
}

impl MockPreloader {
    pub fn new(identity: &str, priority: i32) -> Self {
        Self {
            identity: identity.to_string(),
            priority,
            magic: Vec::new(),
            mime_type: "application/octet-stream".to_string(),
        }
    }

    /// Recognize headers starting with `magic` as `mime_type`.
    pub fn recognizing(mut self, magic: &[u8], mime_type: &str) -> Self {
        self.magic = magic.to_vec();
        self.mime_type = mime_type.to_string();
        self
    }

    pub fn shared(self) -> Arc<dyn Preloader> {
        Arc::new(self)
    }
}

impl Implementation for MockPreloader {
    fn identity(&self) -> &str {
        &self.identity
    }
}

impl Preloader for MockPreloader {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn preload(&self, uri: &str, header: &[u8]) -> Option<ImageDescriptor> {
        (!self.magic.is_empty() && header.starts_with(&self.magic))
            .then(|| ImageDescriptor::new(uri, self.mime_type.as_str()))
    }
}
