// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types shared by the capability traits and the registry indexes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The four kinds of pluggable implementation the registry tracks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityKind {
    Preloader,
    Loader,
    Converter,
    Writer,
}

/// A variant of a decoded or encoded representation, finer-grained than a MIME type.
///
/// Flavors form a hierarchy: a flavor may *refine* a parent flavor, as an SVG
/// DOM refines a generic XML DOM. Equality is structural over the whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Flavor {
    name: Arc<str>,
    parent: Option<Arc<Flavor>>,
}

impl Flavor {
    /// Creates a root flavor with no parent.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    /// Creates a flavor that refines `parent`.
    pub fn refining(name: impl Into<Arc<str>>, parent: &Flavor) -> Self {
        Self {
            name: name.into(),
            parent: Some(Arc::new(parent.clone())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Flavor> {
        self.parent.as_deref()
    }

    /// Returns true if `self` is a strict refinement of `ancestor`, at any depth.
    pub fn refines(&self, ancestor: &Flavor) -> bool {
        let mut current = self.parent();
        while let Some(flavor) = current {
            if flavor == ancestor {
                return true;
            }
            current = flavor.parent();
        }
        false
    }

    /// Returns true if an implementation producing `self` can satisfy a request
    /// for `requested`.
    ///
    /// Holds for equal flavors and when `self` refines `requested`. Never the
    /// reverse: a generic XML DOM does not satisfy a request for an SVG DOM.
    pub fn covers(&self, requested: &Flavor) -> bool {
        self == requested || self.refines(requested)
    }

    pub fn rendered_image() -> Self {
        Self::new("RenderedImage")
    }

    pub fn buffered_image() -> Self {
        Self::new("BufferedImage")
    }

    pub fn graphics2d() -> Self {
        Self::new("Graphics2DImage")
    }

    pub fn raw_jpeg() -> Self {
        Self::new("RawJPEG")
    }

    pub fn raw_png() -> Self {
        Self::new("RawPNG")
    }

    pub fn raw_tiff() -> Self {
        Self::new("RawTIFF")
    }

    pub fn raw_eps() -> Self {
        Self::new("RawEPS")
    }

    pub fn xml_dom() -> Self {
        Self::new("text/xml;DOM")
    }

    pub fn svg_dom() -> Self {
        Self::refining("image/svg+xml;DOM", &Self::xml_dom())
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Free-standing form of [`Flavor::covers`].
pub fn covers(candidate: &Flavor, requested: &Flavor) -> bool {
    candidate.covers(requested)
}

/// A content type plus an optional flavor: the key an implementation is indexed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityKey {
    pub mime_type: String,
    pub flavor: Option<Flavor>,
}

impl CapabilityKey {
    pub fn new(mime_type: impl Into<String>, flavor: Option<Flavor>) -> Self {
        Self {
            mime_type: mime_type.into(),
            flavor,
        }
    }

    /// Key for a MIME type with no flavor constraint.
    pub fn for_type(mime_type: impl Into<String>) -> Self {
        Self::new(mime_type, None)
    }

    /// Returns true if a candidate registered under `self` can serve `requested`.
    ///
    /// MIME types must match exactly. A missing flavor on either side imposes
    /// no constraint; otherwise [`Flavor::covers`] decides.
    pub fn covers(&self, requested: &CapabilityKey) -> bool {
        if self.mime_type != requested.mime_type {
            return false;
        }
        match (&self.flavor, &requested.flavor) {
            (Some(candidate), Some(wanted)) => candidate.covers(wanted),
            _ => true,
        }
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.flavor {
            Some(flavor) => write!(f, "{} [{}]", self.mime_type, flavor),
            None => f.write_str(&self.mime_type),
        }
    }
}

/// What a query knows about the resource it wants loaded.
///
/// Produced by a preloader; the registry only reads the MIME type, the rest is
/// handed to `LoaderFactory::is_supported` for finer-grained checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub uri: String,
    pub mime_type: String,
}

impl ImageDescriptor {
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn flavor_covers_itself() {
        let f = Flavor::rendered_image();
        assert!(f.covers(&Flavor::rendered_image()));
        assert!(!f.covers(&Flavor::buffered_image()));
    }

    #[test]
    fn refined_flavor_covers_its_ancestors_only() {
        let xml = Flavor::xml_dom();
        let svg = Flavor::svg_dom();
        assert!(svg.covers(&xml));
        assert!(!xml.covers(&svg));
    }

    #[test]
    fn refinement_is_transitive() {
        let base = Flavor::new("base");
        let mid = Flavor::refining("mid", &base);
        let leaf = Flavor::refining("leaf", &mid);
        assert!(leaf.refines(&base));
        assert!(leaf.covers(&mid));
        assert!(!base.refines(&base));
    }

    #[test]
    fn capability_key_requires_same_mime_type() {
        let key = CapabilityKey::new("image/png", Some(Flavor::raw_png()));
        assert!(!key.covers(&CapabilityKey::new("image/jpeg", Some(Flavor::raw_png()))));
        assert!(key.covers(&CapabilityKey::new("image/png", Some(Flavor::raw_png()))));
    }

    #[test]
    fn flavorless_key_covers_any_flavor() {
        let writer_key = CapabilityKey::for_type("image/png");
        assert!(writer_key.covers(&CapabilityKey::new("image/png", Some(Flavor::raw_png()))));
        assert_eq!(writer_key.to_string(), "image/png");
    }

    #[test]
    fn capability_kind_display_round_trip() {
        for kind in [
            CapabilityKind::Preloader,
            CapabilityKind::Loader,
            CapabilityKind::Converter,
            CapabilityKind::Writer,
        ] {
            let parsed = CapabilityKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(parsed, kind);
        }
    }
}
