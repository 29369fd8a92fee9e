// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The registry facade.
//!
//! `CapabilityRegistry` owns one index per capability kind plus the penalty
//! table they all rank against. Every method takes `&self`; each index
//! guards its own state, so one registry can be shared freely across threads.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use capreg_config::RegistryConfig;
use capreg_core::{
    CapregError, Converter, Flavor, ImageDescriptor, ImageWriter, LoaderFactory, Penalty, Preloader,
};
use tracing::debug;

use crate::converter::{ConverterList, ConverterSnapshot};
use crate::loader::LoaderIndex;
use crate::penalty_table::PenaltyTable;
use crate::preferred::PreferredOrder;
use crate::preloader::PreloaderIndex;
use crate::writer::WriterIndex;

static GLOBAL: LazyLock<CapabilityRegistry> = LazyLock::new(CapabilityRegistry::new);

/// Runtime registry of preloaders, loader factories, converters and writers.
pub struct CapabilityRegistry {
    penalties: Arc<PenaltyTable>,
    preloaders: PreloaderIndex,
    loaders: LoaderIndex,
    converters: ConverterList,
    writers: WriterIndex,
    discovery_capacity: usize,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    /// An empty registry with the compiled-in defaults.
    pub fn new() -> Self {
        Self::from_config(&RegistryConfig::default())
    }

    /// An empty registry seeded with configured penalties and preferred order.
    pub fn from_config(config: &RegistryConfig) -> Self {
        let penalties = Arc::new(PenaltyTable::from_entries(
            config.penalties.iter().map(|(id, p)| (id.clone(), *p)),
        ));
        debug!(
            penalties = penalties.len(),
            preferred_order = config.writers.preferred_order.len(),
            "creating capability registry"
        );
        Self {
            preloaders: PreloaderIndex::new(Arc::clone(&penalties)),
            loaders: LoaderIndex::new(Arc::clone(&penalties)),
            converters: ConverterList::new(),
            writers: WriterIndex::new(Arc::clone(&penalties), PreferredOrder::from_config(&config.writers)),
            penalties,
            discovery_capacity: config.discovery.channel_capacity,
        }
    }

    /// The process-wide registry, created with defaults on first access.
    pub fn global() -> &'static CapabilityRegistry {
        &GLOBAL
    }

    // --- preloaders ---

    pub fn register_preloader(&self, preloader: Arc<dyn Preloader>) -> Result<bool, CapregError> {
        self.preloaders.register(preloader)
    }

    pub fn unregister_preloader(&self, preloader: &Arc<dyn Preloader>) -> bool {
        self.preloaders.unregister(preloader)
    }

    /// Preloaders in the order they should be tried.
    pub fn sorted_preloaders(&self) -> Vec<Arc<dyn Preloader>> {
        self.preloaders.sorted()
    }

    /// Runs the preloaders in order and returns the first description produced.
    pub fn preload(&self, uri: &str, header: &[u8]) -> Option<ImageDescriptor> {
        self.preloaders
            .sorted()
            .iter()
            .find_map(|preloader| preloader.preload(uri, header))
    }

    // --- loaders ---

    pub fn register_loader(
        &self,
        factory: Arc<dyn LoaderFactory>,
        mime_type: &str,
        flavors: &[Flavor],
    ) -> Result<usize, CapregError> {
        self.loaders.register(factory, mime_type, flavors)
    }

    /// Registers a factory under everything it advertises.
    pub fn register_loader_factory(&self, factory: Arc<dyn LoaderFactory>) -> Result<usize, CapregError> {
        self.loaders.register_factory(factory)
    }

    pub fn unregister_loader(&self, factory: &Arc<dyn LoaderFactory>, mime_type: &str, flavors: &[Flavor]) -> usize {
        self.loaders.unregister(factory, mime_type, flavors)
    }

    pub fn unregister_loader_factory(&self, factory: &Arc<dyn LoaderFactory>) -> usize {
        self.loaders.unregister_factory(factory)
    }

    pub fn best_loader(&self, descriptor: &ImageDescriptor, flavor: &Flavor) -> Option<Arc<dyn LoaderFactory>> {
        self.loaders.best_match(descriptor, flavor)
    }

    pub fn all_loaders(&self, descriptor: &ImageDescriptor, flavor: &Flavor) -> Option<Vec<Arc<dyn LoaderFactory>>> {
        self.loaders.all_matches(descriptor, flavor)
    }

    pub fn loaders_for_type(&self, mime_type: &str) -> Option<Vec<Arc<dyn LoaderFactory>>> {
        self.loaders.by_type(mime_type)
    }

    // --- converters ---

    pub fn register_converter(&self, converter: Arc<dyn Converter>) -> Result<bool, CapregError> {
        self.converters.register(converter)
    }

    pub fn unregister_converter(&self, converter: &Arc<dyn Converter>) -> bool {
        self.converters.unregister(converter)
    }

    pub fn converters(&self) -> Arc<ConverterSnapshot> {
        self.converters.snapshot()
    }

    pub fn converters_modifications(&self) -> u64 {
        self.converters.modification_count()
    }

    // --- writers ---

    pub fn register_writer(&self, writer: Arc<dyn ImageWriter>) -> Result<bool, CapregError> {
        self.writers.register(writer)
    }

    pub fn register_writer_with_priority(&self, writer: Arc<dyn ImageWriter>, priority: i32) -> Result<bool, CapregError> {
        self.writers.register_with_priority(writer, priority)
    }

    pub fn unregister_writer(&self, writer: &Arc<dyn ImageWriter>) -> bool {
        self.writers.unregister(writer)
    }

    pub fn writer_for(&self, mime_type: &str) -> Option<Arc<dyn ImageWriter>> {
        self.writers.writer_for(mime_type)
    }

    pub fn writers_for(&self, mime_type: &str) -> Vec<Arc<dyn ImageWriter>> {
        self.writers.writers_for(mime_type)
    }

    pub fn replace_preferred_order(&self, order: PreferredOrder) {
        self.writers.replace_preferred_order(order);
    }

    pub fn preferred_order(&self) -> Arc<PreferredOrder> {
        self.writers.preferred_order()
    }

    // --- penalties ---

    /// Sets a penalty override for `identity`, registered or not.
    pub fn set_penalty(&self, identity: impl Into<String>, penalty: Penalty) {
        self.penalties.set(identity, penalty);
    }

    pub fn clear_penalty(&self, identity: &str) -> Option<Penalty> {
        self.penalties.clear(identity)
    }

    pub fn penalty(&self, identity: &str) -> Penalty {
        self.penalties.get(identity)
    }

    pub fn penalties(&self) -> BTreeMap<String, Penalty> {
        self.penalties.snapshot()
    }

    // --- direct index access, for administration ---

    pub fn preloader_index(&self) -> &PreloaderIndex {
        &self.preloaders
    }

    pub fn loader_index(&self) -> &LoaderIndex {
        &self.loaders
    }

    pub fn converter_list(&self) -> &ConverterList {
        &self.converters
    }

    pub fn writer_index(&self) -> &WriterIndex {
        &self.writers
    }

    pub fn penalty_table(&self) -> &Arc<PenaltyTable> {
        &self.penalties
    }

    /// Configured capacity of the discovery channel.
    pub fn discovery_capacity(&self) -> usize {
        self.discovery_capacity
    }
}
