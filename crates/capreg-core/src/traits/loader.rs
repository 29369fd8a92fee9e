// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::CapregError;
use crate::traits::Implementation;
use crate::types::{Flavor, ImageDescriptor};

/// Factory for loaders that decode one or more MIME types into flavors.
pub trait LoaderFactory: Implementation {
    /// MIME types this factory can load.
    fn mime_types(&self) -> &[String];

    /// Flavors this factory can produce for `mime_type`.
    fn flavors(&self, mime_type: &str) -> Vec<Flavor>;

    /// Coarse availability check performed once at registration, e.g. whether
    /// an optional native codec is present. Unavailable factories are skipped.
    fn is_available(&self) -> bool {
        true
    }

    /// Finer-grained check against a concrete resource.
    ///
    /// May be slow; the registry never calls it while holding a lock. An
    /// `Err` means "not usable" and selection moves on to the next candidate.
    fn is_supported(&self, descriptor: &ImageDescriptor) -> Result<bool, CapregError>;

    /// Intrinsic cost of loading into `flavor`, lower is cheaper.
    fn usage_penalty(&self, flavor: &Flavor) -> i32;
}
