use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::sync::{Mutex, RwLock};
use volley_entities::{prelude::TeamAssignment, EngineError, Uuid};

type CacheSlot = Arc<Mutex<Option<Arc<TeamAssignment>>>>;

/// Holds the team split of each event once it has been computed.
///
/// Entries never expire on their own. New votes do not change a cached
/// split, only `invalidate` does.
#[derive(Default)]
pub struct TeamResultCache {
    slots: RwLock<HashMap<Uuid, CacheSlot>>,
}

impl TeamResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, event_id: Uuid) -> CacheSlot {
        if let Some(slot) = self.slots.read().await.get(&event_id) {
            return slot.clone();
        }
        self.slots.write().await.entry(event_id).or_default().clone()
    }

    pub async fn get(&self, event_id: Uuid) -> Option<Arc<TeamAssignment>> {
        let slot = self.slots.read().await.get(&event_id).cloned()?;
        let cached = slot.lock().await.clone();
        cached
    }

    /// Returns the cached split, or runs `compute` and caches its result.
    /// Concurrent callers for the same event wait for the first one, so
    /// `compute` runs at most once per event until invalidated.
    pub async fn get_or_try_compute<F, Fut>(&self, event_id: Uuid, compute: F) -> Result<Arc<TeamAssignment>, EngineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TeamAssignment, EngineError>>,
    {
        let slot = self.slot(event_id).await;
        let mut cached = slot.lock().await;

        if let Some(assignment) = cached.as_ref() {
            tracing::debug!("Cache hit for teams of event {}", event_id);
            return Ok(assignment.clone());
        }

        tracing::debug!("Cache miss for teams of event {}", event_id);
        let assignment = Arc::new(compute().await?);
        *cached = Some(assignment.clone());
        Ok(assignment)
    }

    /// Drops the cached split. Returns whether there was one.
    pub async fn invalidate(&self, event_id: Uuid) -> bool {
        let Some(slot) = self.slots.read().await.get(&event_id).cloned() else {
            return false;
        };
        let removed = slot.lock().await.take().is_some();
        if removed {
            tracing::info!("Invalidated cached teams of event {}", event_id);
        }
        removed
    }
}
