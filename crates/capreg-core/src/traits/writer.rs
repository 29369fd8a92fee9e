// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::CapregError;
use crate::traits::Implementation;

/// Encodes images into a single target MIME type.
pub trait ImageWriter: Implementation {
    fn mime_type(&self) -> &str;

    /// Whether the writer can actually be used right now (e.g. its native
    /// codec is installed). May be slow, never invoked under a registry lock.
    fn is_functional(&self) -> Result<bool, CapregError> {
        Ok(true)
    }
}
