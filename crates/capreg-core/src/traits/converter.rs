// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::traits::Implementation;
use crate::types::Flavor;

/// Converts an already-loaded image from one flavor into another.
pub trait Converter: Implementation {
    fn source_flavors(&self) -> Vec<Flavor>;

    fn target_flavor(&self) -> Flavor;

    /// Cost of one conversion step, used by pipelines that chain converters.
    fn conversion_penalty(&self) -> i32;
}
