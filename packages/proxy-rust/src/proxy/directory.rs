use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::warn;

use super::router::InvocationRouter;
use crate::traits::MultiRepository;

// ---------------------------------------------------------------------------
// RouterDirectory
// ---------------------------------------------------------------------------

/// Live routers keyed by the simple name of the interface they implement.
///
/// Provides two lookup mechanisms:
/// - **By name** (`get`): the interface's simple name
/// - **By facade type** (`resolve::<P>`): wraps the router in a typed
///   [`MultiRepository`] adapter
///
/// Installation order is kept for deterministic listing.
pub struct RouterDirectory {
    by_name: DashMap<String, Arc<InvocationRouter>>,
    install_order: RwLock<Vec<String>>,
}

impl RouterDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            install_order: RwLock::new(Vec::new()),
        }
    }

    /// Installs `router` under its interface name, returning the router it
    /// replaced.
    pub fn register(&self, router: Arc<InvocationRouter>) -> Option<Arc<InvocationRouter>> {
        let name = router.name().to_string();
        let previous = self.by_name.insert(name.clone(), router);
        if previous.is_some() {
            warn!(interface = %name, "router replaced an existing registration");
        } else {
            self.install_order.write().push(name);
        }
        previous
    }

    /// Retrieve a router by interface name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<InvocationRouter>> {
        self.by_name.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Retrieve the router for `P` wrapped in its typed facade.
    #[must_use]
    pub fn resolve<P: MultiRepository>(&self) -> Option<P> {
        self.get(P::NAME).map(P::from_router)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Interface names in installation order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.install_order.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for RouterDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RouterDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterDirectory")
            .field("names", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
