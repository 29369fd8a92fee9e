// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feeding discovered implementations into a registry.
//!
//! Whatever finds implementations (a plugin directory scan, a service
//! tracker) sends [`DiscoveryEvent`]s down a bounded channel; the registry
//! side drains it with [`run_discovery`]. Events are applied in the order
//! they are received.

use std::fmt;
use std::sync::Arc;

use capreg_core::{
    CapabilityKind, CapregError, Converter, ImageWriter, Implementation, LoaderFactory, Preloader,
};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::registry::CapabilityRegistry;

/// A discovered implementation of one capability kind.
#[derive(Clone)]
pub enum DiscoveredImpl {
    Preloader(Arc<dyn Preloader>),
    /// Registered under every MIME type and flavor it advertises.
    Loader(Arc<dyn LoaderFactory>),
    Converter(Arc<dyn Converter>),
    Writer(Arc<dyn ImageWriter>),
}

impl DiscoveredImpl {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            DiscoveredImpl::Preloader(_) => CapabilityKind::Preloader,
            DiscoveredImpl::Loader(_) => CapabilityKind::Loader,
            DiscoveredImpl::Converter(_) => CapabilityKind::Converter,
            DiscoveredImpl::Writer(_) => CapabilityKind::Writer,
        }
    }

    pub fn identity(&self) -> &str {
        match self {
            DiscoveredImpl::Preloader(p) => p.identity(),
            DiscoveredImpl::Loader(l) => l.identity(),
            DiscoveredImpl::Converter(c) => c.identity(),
            DiscoveredImpl::Writer(w) => w.identity(),
        }
    }
}

impl fmt::Debug for DiscoveredImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredImpl")
            .field("kind", &self.kind())
            .field("identity", &self.identity())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    Added(DiscoveredImpl),
    Removed(DiscoveredImpl),
}

/// Receives implementations as they appear and disappear.
pub trait DiscoveryListener: Send + Sync {
    /// Returns whether anything new was registered.
    fn on_implementation_added(&self, implementation: DiscoveredImpl) -> Result<bool, CapregError>;

    /// Returns whether anything was removed.
    fn on_implementation_removed(&self, implementation: &DiscoveredImpl) -> bool;
}

impl DiscoveryListener for CapabilityRegistry {
    fn on_implementation_added(&self, implementation: DiscoveredImpl) -> Result<bool, CapregError> {
        match implementation {
            DiscoveredImpl::Preloader(p) => self.register_preloader(p),
            DiscoveredImpl::Loader(l) => self.register_loader_factory(l).map(|added| added > 0),
            DiscoveredImpl::Converter(c) => self.register_converter(c),
            DiscoveredImpl::Writer(w) => self.register_writer(w),
        }
    }

    fn on_implementation_removed(&self, implementation: &DiscoveredImpl) -> bool {
        match implementation {
            DiscoveredImpl::Preloader(p) => self.unregister_preloader(p),
            DiscoveredImpl::Loader(l) => self.unregister_loader_factory(l) > 0,
            DiscoveredImpl::Converter(c) => self.unregister_converter(c),
            DiscoveredImpl::Writer(w) => self.unregister_writer(w),
        }
    }
}

/// Bounded channel for discovery events. A zero capacity is raised to one.
pub fn discovery_channel(capacity: usize) -> (mpsc::Sender<DiscoveryEvent>, mpsc::Receiver<DiscoveryEvent>) {
    mpsc::channel(capacity.max(1))
}

/// Applies one event. Registration failures are logged, never returned.
pub fn apply<L: DiscoveryListener + ?Sized>(listener: &L, event: DiscoveryEvent) {
    match event {
        DiscoveryEvent::Added(implementation) => {
            let kind = implementation.kind();
            let identity = implementation.identity().to_string();
            match listener.on_implementation_added(implementation) {
                Ok(added) => debug!(%kind, identity = identity.as_str(), added, "discovered implementation"),
                Err(err) => error!(%kind, identity = identity.as_str(), error = %err, "failed to register discovered implementation"),
            }
        }
        DiscoveryEvent::Removed(implementation) => {
            let removed = listener.on_implementation_removed(&implementation);
            debug!(
                kind = %implementation.kind(),
                identity = implementation.identity(),
                removed,
                "implementation withdrawn"
            );
        }
    }
}

/// Drains `receiver` into `listener` until every sender is dropped.
///
/// Returns the number of events applied.
pub async fn run_discovery<L: DiscoveryListener + ?Sized>(
    listener: &L,
    mut receiver: mpsc::Receiver<DiscoveryEvent>,
) -> usize {
    let mut applied = 0;
    while let Some(event) = receiver.recv().await {
        apply(listener, event);
        applied += 1;
    }
    debug!(applied, "discovery channel closed");
    applied
}

impl CapabilityRegistry {
    /// A channel sized by this registry's configured discovery capacity.
    pub fn discovery_channel(&self) -> (mpsc::Sender<DiscoveryEvent>, mpsc::Receiver<DiscoveryEvent>) {
        discovery_channel(self.discovery_capacity())
    }

    pub async fn run_discovery(&self, receiver: mpsc::Receiver<DiscoveryEvent>) -> usize {
        run_discovery(self, receiver).await
    }
}
