//! RouteStore - the shared, swappable route collection.
//!
//! Dispatch takes a [`RouteSnapshot`] at the start of each request and
//! iterates it without holding any lock. Mutations build a complete new
//! collection and install it under the write lock, so a reader observes
//! either the old or the new collection in full.

use super::types::RouteConfig;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Immutable view of the route collection at one version.
#[derive(Debug, Clone)]
pub struct RouteSnapshot {
    version: u64,
    routes: Arc<[RouteConfig]>,
}

impl RouteSnapshot {
    fn new(version: u64, routes: Vec<RouteConfig>) -> Self {
        Self {
            version,
            routes: routes.into(),
        }
    }

    /// Monotonic version, bumped on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn routes(&self) -> &[RouteConfig] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Route index {index} out of range ({len} routes)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Holds the current route snapshot
pub struct RouteStore {
    current: RwLock<RouteSnapshot>,
}

impl RouteStore {
    pub fn new(routes: Vec<RouteConfig>) -> Self {
        Self {
            current: RwLock::new(RouteSnapshot::new(0, routes)),
        }
    }

    /// Current snapshot. The read lock is released before this returns.
    pub fn snapshot(&self) -> RouteSnapshot {
        self.current.read().clone()
    }

    /// Replace the whole collection.
    pub fn replace(&self, routes: Vec<RouteConfig>) -> u64 {
        self.update(|_| routes)
    }

    /// Append routes after the existing ones (merge import).
    pub fn append(&self, routes: Vec<RouteConfig>) -> u64 {
        self.update(|existing| {
            let mut merged = existing.to_vec();
            merged.extend(routes);
            merged
        })
    }

    /// Remove the route at `index`.
    pub fn remove(&self, index: usize) -> Result<RouteConfig, StoreError> {
        let mut current = self.current.write();
        let len = current.len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange { index, len });
        }

        let mut routes = current.routes.to_vec();
        let removed = routes.remove(index);
        *current = RouteSnapshot::new(current.version + 1, routes);
        info!(
            "Removed route {} ({} {}), version {}",
            index, removed.method, removed.path, current.version
        );
        Ok(removed)
    }

    /// Remove every route whose index is listed. Unknown indices are ignored.
    /// Returns how many routes were removed.
    pub fn remove_many(&self, indices: &[usize]) -> usize {
        let doomed: HashSet<usize> = indices.iter().copied().collect();
        let mut current = self.current.write();

        let before = current.len();
        let routes: Vec<RouteConfig> = current
            .routes
            .iter()
            .enumerate()
            .filter(|(i, _)| !doomed.contains(i))
            .map(|(_, route)| route.clone())
            .collect();
        let removed = before - routes.len();

        *current = RouteSnapshot::new(current.version + 1, routes);
        info!("Removed {} routes, version {}", removed, current.version);
        removed
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    fn update(&self, f: impl FnOnce(&[RouteConfig]) -> Vec<RouteConfig>) -> u64 {
        let mut current = self.current.write();
        let routes = f(current.routes());
        *current = RouteSnapshot::new(current.version + 1, routes);
        info!(
            "Installed {} routes, version {}",
            current.len(),
            current.version
        );
        current.version
    }
}

impl Default for RouteStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str) -> RouteConfig {
        RouteConfig {
            method: "GET".to_string(),
            path: path.to_string(),
            ..Default::default()
        }
    }

    fn paths(snapshot: &RouteSnapshot) -> Vec<&str> {
        snapshot.routes().iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let store = RouteStore::new(vec![route("/a"), route("/b")]);
        let before = store.snapshot();

        let version = store.replace(vec![route("/c")]);

        assert_eq!(version, 1);
        assert_eq!(paths(&before), ["/a", "/b"]);
        assert_eq!(before.version(), 0);
        assert_eq!(paths(&store.snapshot()), ["/c"]);
    }

    #[test]
    fn test_append() {
        let store = RouteStore::new(vec![route("/a")]);
        store.append(vec![route("/b"), route("/c")]);
        assert_eq!(paths(&store.snapshot()), ["/a", "/b", "/c"]);
    }

    #[test]
    fn test_remove() {
        let store = RouteStore::new(vec![route("/a"), route("/b"), route("/c")]);
        let removed = store.remove(1).unwrap();
        assert_eq!(removed.path, "/b");
        assert_eq!(paths(&store.snapshot()), ["/a", "/c"]);
        assert_eq!(store.snapshot().version(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let store = RouteStore::new(vec![route("/a")]);
        assert_eq!(
            store.remove(3),
            Err(StoreError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(store.snapshot().version(), 0);
    }

    #[test]
    fn test_remove_many() {
        let store = RouteStore::new(vec![route("/a"), route("/b"), route("/c"), route("/d")]);
        let removed = store.remove_many(&[0, 2, 2, 99]);
        assert_eq!(removed, 2);
        assert_eq!(paths(&store.snapshot()), ["/b", "/d"]);
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let store = Arc::new(RouteStore::new(vec![route("/old1"), route("/old2")]));

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = store.snapshot();
                        let p = paths(&snapshot);
                        assert!(
                            p == ["/old1", "/old2"] || p == ["/new1", "/new2", "/new3"],
                            "torn snapshot: {p:?}"
                        );
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            store.replace(vec![route("/new1"), route("/new2"), route("/new3")]);
            store.replace(vec![route("/old1"), route("/old2")]);
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
