//! Endpoint registry: name → connection profile

use sparqlgate_core::EndpointProfile;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type EndpointMap = HashMap<String, Arc<EndpointProfile>>;

/// Registry of remote endpoint profiles keyed by exact, case-sensitive name.
///
/// The mapping is an immutable snapshot behind a lock. Writers build a new map
/// and swap it in, so a reader never observes a partially applied update and
/// never holds the lock beyond the map access itself.
pub struct EndpointRegistry {
    endpoints: RwLock<Arc<EndpointMap>>,
}

impl EndpointRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            endpoints: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// Build a registry from profiles. Later duplicates replace earlier ones.
    pub fn from_profiles(profiles: impl IntoIterator<Item = EndpointProfile>) -> Self {
        Self {
            endpoints: RwLock::new(Arc::new(build_map(profiles))),
        }
    }

    /// Insert or replace a profile; returns the one it replaced
    pub async fn register(&self, profile: EndpointProfile) -> Option<Arc<EndpointProfile>> {
        let mut guard = self.endpoints.write().await;
        // Copies the map only if a reader still holds the current snapshot
        let map = Arc::make_mut(&mut *guard);
        map.insert(profile.name.clone(), Arc::new(profile))
    }

    /// Look up a profile by exact name
    pub async fn lookup(&self, name: &str) -> Option<Arc<EndpointProfile>> {
        let guard = self.endpoints.read().await;
        guard.get(name).cloned()
    }

    /// Atomically replace the whole mapping; returns the new endpoint count
    pub async fn replace_all(&self, profiles: impl IntoIterator<Item = EndpointProfile>) -> usize {
        let next = Arc::new(build_map(profiles));
        let count = next.len();
        *self.endpoints.write().await = next;
        count
    }

    /// Current mapping as a consistent snapshot
    pub async fn snapshot(&self) -> Arc<HashMap<String, Arc<EndpointProfile>>> {
        self.endpoints.read().await.clone()
    }

    /// Registered names, sorted
    pub async fn names(&self) -> Vec<String> {
        let snapshot = self.snapshot().await;
        let mut names: Vec<String> = snapshot.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.endpoints.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.endpoints.read().await.is_empty()
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn build_map(profiles: impl IntoIterator<Item = EndpointProfile>) -> EndpointMap {
    profiles
        .into_iter()
        .map(|p| (p.name.clone(), Arc::new(p)))
        .collect()
}
