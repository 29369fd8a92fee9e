// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::traits::Implementation;
use crate::types::ImageDescriptor;

/// Cheap format sniffer run before any loader is chosen.
///
/// Pipelines walk the preloaders in ranked order and stop at the first one
/// that recognizes the resource.
pub trait Preloader: Implementation {
    /// Intrinsic priority, lower runs earlier.
    fn priority(&self) -> i32;

    /// Inspects the first bytes of a resource and describes it if recognized.
    fn preload(&self, uri: &str, header: &[u8]) -> Option<ImageDescriptor>;
}
