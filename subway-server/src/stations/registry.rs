//! In-memory station registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{Station, StationId};

use super::error::StationError;

#[derive(Debug, Default)]
struct Inner {
    stations: BTreeMap<StationId, Station>,
    next_id: u64,
}

/// Thread-safe station registry.
///
/// Cloning is cheap; all clones share the same stations.
#[derive(Clone, Default)]
pub struct StationRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl StationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new station and return it with its freshly issued id.
    pub async fn create(&self, name: &str) -> Result<Station, StationError> {
        let mut guard = self.inner.write().await;
        let id = StationId::new(guard.next_id + 1);
        let station = Station::new(id, name)?;

        if guard.stations.values().any(|s| s.name == station.name) {
            return Err(StationError::DuplicateName(station.name));
        }

        guard.next_id += 1;
        guard.stations.insert(id, station.clone());
        info!(station = %id, name = %station.name, "station registered");
        Ok(station)
    }

    /// Look up a station by id.
    pub async fn get(&self, id: StationId) -> Result<Station, StationError> {
        let guard = self.inner.read().await;
        guard
            .stations
            .get(&id)
            .cloned()
            .ok_or(StationError::NotFound(id))
    }

    /// Resolve several ids at once, preserving order.
    pub async fn resolve(
        &self,
        ids: impl IntoIterator<Item = StationId>,
    ) -> Result<Vec<Station>, StationError> {
        let guard = self.inner.read().await;
        ids.into_iter()
            .map(|id| {
                guard
                    .stations
                    .get(&id)
                    .cloned()
                    .ok_or(StationError::NotFound(id))
            })
            .collect()
    }

    /// All stations, ordered by id.
    pub async fn list(&self) -> Vec<Station> {
        let guard = self.inner.read().await;
        guard.stations.values().cloned().collect()
    }

    /// Get the number of registered stations.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.stations.len()
    }

    /// Check if the registry is empty.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.stations.is_empty()
    }
}
