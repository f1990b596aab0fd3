use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use volley_entities::{prelude::Participant, Uuid};


/// Lookup of user reference data. Users are owned outside of the engine,
/// so implementations only ever read.
///
/// Errors are infrastructure failures, a missing user is reported by
/// leaving it out of the result.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Participant>>;
}

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, Participant>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_participants(participants: Vec<Participant>) -> Self {
        InMemoryUserDirectory {
            users: RwLock::new(participants.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    pub async fn insert(&self, participant: Participant) {
        self.users.write().await.insert(participant.id, participant);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Participant>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}
