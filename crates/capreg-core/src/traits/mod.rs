// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by pluggable implementations.
//!
//! Each trait is a small capability surface; the registry is generic over the
//! trait object, never over concrete implementation types. All of them extend
//! [`Implementation`], which supplies the stable identity string used to look
//! up penalty overrides.

pub mod converter;
pub mod implementation;
pub mod loader;
pub mod preloader;
pub mod writer;

pub use converter::Converter;
pub use implementation::Implementation;
pub use loader::LoaderFactory;
pub use preloader::Preloader;
pub use writer::ImageWriter;
