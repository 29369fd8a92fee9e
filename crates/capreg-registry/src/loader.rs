// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-level loader index: MIME type -> flavor -> candidate factories.
//!
//! Queries copy the relevant buckets under a read lock, then rank and probe
//! (`LoaderFactory::is_supported`) with no lock held, so a slow probe never
//! blocks registration or other queries.

use std::collections::HashMap;
use std::sync::Arc;

use capreg_core::{
    CapabilityKey, CapabilityKind, CapregError, Flavor, ImageDescriptor, Implementation, LoaderFactory,
};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::penalty_table::PenaltyTable;
use crate::ranking::{dedup_by_instance, rank, RankedEntry};

type FlavorBuckets = HashMap<Flavor, Vec<RankedEntry<dyn LoaderFactory>>>;

/// Index of loader factories by MIME type and flavor.
pub struct LoaderIndex {
    penalties: Arc<PenaltyTable>,
    buckets: RwLock<HashMap<String, FlavorBuckets>>,
}

impl LoaderIndex {
    pub fn new(penalties: Arc<PenaltyTable>) -> Self {
        Self {
            penalties,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `factory` under `(mime_type, flavor)` for every given flavor.
    ///
    /// A factory that reports itself unavailable is skipped and logged, not
    /// registered: returns `Ok(0)`. Otherwise returns how many buckets gained
    /// an entry; buckets that already hold this instance are left alone.
    pub fn register(
        &self,
        factory: Arc<dyn LoaderFactory>,
        mime_type: &str,
        flavors: &[Flavor],
    ) -> Result<usize, CapregError> {
        validate(factory.as_ref(), mime_type, flavors)?;
        if !factory.is_available() {
            debug!(identity = factory.identity(), "loader factory reports not available, skipped");
            return Ok(0);
        }
        Ok(self.insert(&factory, mime_type, flavors))
    }

    /// Registers `factory` under every MIME type and flavor it advertises.
    pub fn register_factory(&self, factory: Arc<dyn LoaderFactory>) -> Result<usize, CapregError> {
        let advertised: Vec<(String, Vec<Flavor>)> = factory
            .mime_types()
            .iter()
            .map(|mime| (mime.clone(), factory.flavors(mime)))
            .collect();
        if advertised.is_empty() {
            return Err(CapregError::invalid_registration(
                CapabilityKind::Loader,
                factory.identity(),
                "no MIME types advertised",
            ));
        }
        for (mime, flavors) in &advertised {
            validate(factory.as_ref(), mime, flavors)?;
        }
        if !factory.is_available() {
            debug!(identity = factory.identity(), "loader factory reports not available, skipped");
            return Ok(0);
        }
        Ok(advertised
            .iter()
            .map(|(mime, flavors)| self.insert(&factory, mime, flavors))
            .sum())
    }

    /// Removes `factory` from each `(mime_type, flavor)` bucket. Missing buckets are ignored.
    pub fn unregister(&self, factory: &Arc<dyn LoaderFactory>, mime_type: &str, flavors: &[Flavor]) -> usize {
        let mut buckets = self.buckets.write();
        let Some(flavor_map) = buckets.get_mut(mime_type) else {
            return 0;
        };
        let mut removed = 0;
        for flavor in flavors {
            let Some(bucket) = flavor_map.get_mut(flavor) else {
                continue;
            };
            let before = bucket.len();
            bucket.retain(|e| !e.is(factory));
            if bucket.len() < before {
                removed += 1;
                debug!(identity = factory.identity(), mime_type, %flavor, "unregistered loader factory");
            }
            if bucket.is_empty() {
                flavor_map.remove(flavor);
            }
        }
        if flavor_map.is_empty() {
            buckets.remove(mime_type);
        }
        removed
    }

    /// Removes `factory` from every bucket it appears in.
    ///
    /// Sweeps the whole index rather than trusting what the factory
    /// advertises now, so nothing dangles if its advertised set changed.
    pub fn unregister_factory(&self, factory: &Arc<dyn LoaderFactory>) -> usize {
        let mut buckets = self.buckets.write();
        let mut removed = 0;
        buckets.retain(|mime_type, flavor_map| {
            flavor_map.retain(|flavor, bucket| {
                let before = bucket.len();
                bucket.retain(|e| !e.is(factory));
                if bucket.len() < before {
                    removed += 1;
                    debug!(identity = factory.identity(), mime_type = mime_type.as_str(), %flavor, "unregistered loader factory");
                }
                !bucket.is_empty()
            });
            !flavor_map.is_empty()
        });
        removed
    }

    /// The cheapest factory registered for exactly `flavor` that supports `descriptor`.
    ///
    /// Candidates are ranked by `usage_penalty(flavor)` plus penalty override
    /// and probed in that order; the first that reports support wins. `None`
    /// when the bucket is missing or no candidate supports the request.
    pub fn best_match(&self, descriptor: &ImageDescriptor, flavor: &Flavor) -> Option<Arc<dyn LoaderFactory>> {
        let candidates = {
            let buckets = self.buckets.read();
            buckets.get(&descriptor.mime_type)?.get(flavor)?.clone()
        };
        rank(&candidates, &self.penalties, |f| f.usage_penalty(flavor))
            .into_iter()
            .map(|ranked| ranked.implementation)
            .find(|factory| probe_supported(factory.as_ref(), descriptor))
    }

    /// Every factory whose flavor covers `flavor` and that supports `descriptor`, ranked.
    ///
    /// Returns `None` rather than an empty list when nothing matches.
    pub fn all_matches(&self, descriptor: &ImageDescriptor, flavor: &Flavor) -> Option<Vec<Arc<dyn LoaderFactory>>> {
        let requested = CapabilityKey::new(descriptor.mime_type.as_str(), Some(flavor.clone()));
        let mut candidates: Vec<RankedEntry<dyn LoaderFactory>> = {
            let buckets = self.buckets.read();
            buckets
                .get(&descriptor.mime_type)?
                .values()
                .flatten()
                .filter(|e| e.key().is_some_and(|key| key.covers(&requested)))
                .cloned()
                .collect()
        };
        dedup_by_instance(&mut candidates);

        let matches: Vec<Arc<dyn LoaderFactory>> = rank(&candidates, &self.penalties, |f| f.usage_penalty(flavor))
            .into_iter()
            .map(|ranked| ranked.implementation)
            .filter(|factory| probe_supported(factory.as_ref(), descriptor))
            .collect();
        (!matches.is_empty()).then_some(matches)
    }

    /// Every factory registered under any flavor of `mime_type`, in registration order.
    ///
    /// No ranking and no penalty filtering: this is an enumeration.
    pub fn by_type(&self, mime_type: &str) -> Option<Vec<Arc<dyn LoaderFactory>>> {
        let mut entries: Vec<RankedEntry<dyn LoaderFactory>> = {
            let buckets = self.buckets.read();
            buckets.get(mime_type)?.values().flatten().cloned().collect()
        };
        dedup_by_instance(&mut entries);
        let factories: Vec<_> = entries.iter().map(|e| Arc::clone(e.implementation())).collect();
        (!factories.is_empty()).then_some(factories)
    }

    /// MIME types with at least one registered factory.
    pub fn mime_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.buckets.read().keys().cloned().collect();
        types.sort();
        types
    }

    fn insert(&self, factory: &Arc<dyn LoaderFactory>, mime_type: &str, flavors: &[Flavor]) -> usize {
        let mut buckets = self.buckets.write();
        let flavor_map = buckets.entry(mime_type.to_string()).or_default();
        let mut added = 0;
        for flavor in flavors {
            let bucket = flavor_map.entry(flavor.clone()).or_default();
            if bucket.iter().any(|e| e.is(factory)) {
                continue;
            }
            let key = CapabilityKey::new(mime_type, Some(flavor.clone()));
            bucket.push(RankedEntry::new(Arc::clone(factory), Some(key)));
            added += 1;
            debug!(identity = factory.identity(), mime_type, %flavor, "registered loader factory");
        }
        added
    }
}

fn validate(factory: &dyn LoaderFactory, mime_type: &str, flavors: &[Flavor]) -> Result<(), CapregError> {
    let reason = if factory.identity().trim().is_empty() {
        "identity must not be empty"
    } else if mime_type.trim().is_empty() {
        "MIME type must not be empty"
    } else if flavors.is_empty() {
        "at least one flavor is required"
    } else {
        return Ok(());
    };
    Err(CapregError::invalid_registration(
        CapabilityKind::Loader,
        factory.identity(),
        reason,
    ))
}

/// Runs the support probe; a failing probe counts as "not supported".
fn probe_supported(factory: &dyn LoaderFactory, descriptor: &ImageDescriptor) -> bool {
    match factory.is_supported(descriptor) {
        Ok(supported) => supported,
        Err(err) => {
            warn!(identity = factory.identity(), uri = descriptor.uri.as_str(), error = %err, "loader support probe failed");
            false
        }
    }
}
