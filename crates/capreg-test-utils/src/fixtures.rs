// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared descriptors and MIME types used across tests.

use capreg_core::ImageDescriptor;

pub const PNG: &str = "image/png";
pub const JPEG: &str = "image/jpeg";
pub const TIFF: &str = "image/tiff";
pub const SVG: &str = "image/svg+xml";

/// Descriptor for a resource of the given MIME type.
pub fn descriptor(mime_type: &str) -> ImageDescriptor {
    ImageDescriptor::new(format!("file:///test/image.{}", extension(mime_type)), mime_type)
}

fn extension(mime_type: &str) -> &str {
    match mime_type {
        PNG => "png",
        JPEG => "jpg",
        TIFF => "tif",
        SVG => "svg",
        _ => "bin",
    }
}
