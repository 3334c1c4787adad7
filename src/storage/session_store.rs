// src/storage/session_store.rs
//
// In-memory store for in-flight verification attempts. Sessions are
// short-lived and lose nothing worth persisting, so there is no database
// behind this; eviction doubles as cleanup because dropping a session
// releases its retained image file.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::pipeline::session::VerificationSession;

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<VerificationSession>>>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::seconds(ttl_secs as i64),
        }
    }

    pub fn insert(&self, session: VerificationSession) -> Uuid {
        let id = session.id;
        self.sessions
            .write()
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    /// Hands out the session handle; callers lock it for the duration of
    /// one pipeline stage. The map lock itself is released immediately.
    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<VerificationSession>>> {
        self.sessions.read().get(id).cloned()
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Evicts sessions idle past the TTL. Sessions whose lock is currently
    /// held are mid-stage and therefore not idle; they are skipped.
    pub fn sweep_expired(&self) -> usize {
        let expired: Vec<Uuid> = self
            .sessions
            .read()
            .iter()
            .filter_map(|(id, handle)| match handle.try_lock() {
                Ok(session) if session.is_idle_longer_than(self.ttl) => Some(*id),
                _ => None,
            })
            .collect();

        if expired.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write();
        for id in &expired {
            sessions.remove(id);
            debug!(session = %id, "evicted idle session");
        }
        expired.len()
    }
}

/// Periodic eviction of abandoned sessions.
pub fn spawn_sweeper(store: Arc<SessionStore>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let evicted = store.sweep_expired();
            if evicted > 0 {
                info!("evicted {} expired session(s)", evicted);
            }
        }
    });
}
