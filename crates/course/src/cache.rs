use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::route::Route;

/// Key-value storage for loaded routes, keyed by route id.
///
/// Injected into [`RouteCache`] so hosts can back it with whatever
/// session-scoped storage they have.
pub trait RouteStore {
    fn get(&self, route_id: &str) -> Option<Arc<Route>>;
    fn insert(&mut self, route_id: String, route: Arc<Route>);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store with stable (sorted) key order.
#[derive(Debug, Default)]
pub struct MemoryRouteStore {
    routes: BTreeMap<String, Arc<Route>>,
}

impl MemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route_ids(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

impl RouteStore for MemoryRouteStore {
    fn get(&self, route_id: &str) -> Option<Arc<Route>> {
        self.routes.get(route_id).cloned()
    }

    fn insert(&mut self, route_id: String, route: Arc<Route>) {
        self.routes.insert(route_id, route);
    }

    fn len(&self) -> usize {
        self.routes.len()
    }
}

/// Session-lifetime cache of parsed routes.
///
/// Lifetime contract:
/// - Each route id is loaded at most once; later lookups share the same
///   `Arc<Route>`.
/// - Entries are never evicted or invalidated during the session.
/// - A failed load stores nothing, so the next lookup retries.
#[derive(Debug, Default)]
pub struct RouteCache<S = MemoryRouteStore> {
    store: S,
}

impl RouteCache<MemoryRouteStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryRouteStore::new())
    }
}

impl<S: RouteStore> RouteCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get(&self, route_id: &str) -> Option<Arc<Route>> {
        self.store.get(route_id)
    }

    pub fn contains(&self, route_id: &str) -> bool {
        self.store.get(route_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Return the cached route, running `load` only on the first request.
    pub fn get_or_load<E>(
        &mut self,
        route_id: &str,
        load: impl FnOnce() -> Result<Route, E>,
    ) -> Result<Arc<Route>, E> {
        if let Some(route) = self.store.get(route_id) {
            return Ok(route);
        }
        let route = Arc::new(load()?);
        debug!(route_id, points = route.len(), "cached route");
        self.store.insert(route_id.to_string(), Arc::clone(&route));
        Ok(route)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
