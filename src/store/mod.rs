//! In-memory session store. Nothing here outlives the process.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::deck::StudyState;

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub id: Uuid,
    pub state: StudyState,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error("session capacity exhausted: max={max}")]
    CapacityExhausted { max: usize },
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
    max_active: usize,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: Duration::from_secs(config.idle_ttl_secs),
            max_active: config.max_active,
        }
    }

    pub async fn create(&self, state: StudyState) -> Result<SessionEntry, StoreError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.max_active {
            let evicted = evict_idle(&mut sessions, now, self.idle_ttl);
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle sessions to make room");
            }
            if sessions.len() >= self.max_active {
                return Err(StoreError::CapacityExhausted {
                    max: self.max_active,
                });
            }
        }

        let entry = SessionEntry {
            id: Uuid::new_v4(),
            state,
            created_at: now,
            last_active_at: now,
        };
        sessions.insert(entry.id, entry.clone());
        Ok(entry)
    }

    /// Read a session and mark it active.
    pub async fn get(&self, id: Uuid) -> Result<SessionEntry, StoreError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.last_active_at = Utc::now();
        Ok(entry.clone())
    }

    /// Run a pure transition against the current state and commit its result.
    ///
    /// The write lock is held for the whole call, so transitions on one
    /// session never interleave. When `transition` fails the stored state is
    /// left as it was.
    pub async fn transition<T, E, F>(&self, id: Uuid, transition: F) -> Result<(SessionEntry, T), E>
    where
        F: FnOnce(&StudyState) -> Result<(StudyState, T), E>,
        E: From<StoreError>,
    {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let (next, output) = transition(&entry.state)?;
        entry.state = next;
        entry.last_active_at = Utc::now();
        Ok((entry.clone(), output))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    /// Drop sessions idle for longer than the configured TTL.
    pub async fn sweep_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, now, self.idle_ttl)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn evict_idle(
    sessions: &mut HashMap<Uuid, SessionEntry>,
    now: DateTime<Utc>,
    ttl: Duration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| {
        (now - entry.last_active_at)
            .to_std()
            .map(|idle| idle <= ttl)
            .unwrap_or(true)
    });
    before - sessions.len()
}
