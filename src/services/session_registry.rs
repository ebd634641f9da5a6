use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::services::detail_service::DetailKey;
use crate::session::DetailSession;

/// Open detail-screen sessions, one per visit.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, Arc<DetailSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, key: DetailKey) -> (Uuid, Arc<DetailSession>) {
        let id = Uuid::new_v4();
        let session = Arc::new(DetailSession::new(key));
        self.lock().insert(id, session.clone());
        (id, session)
    }

    pub fn get(&self, id: Uuid) -> Result<Arc<DetailSession>> {
        self.lock()
            .get(&id)
            .cloned()
            .ok_or(Error::SessionNotFound(id))
    }

    /// Drops the session. In-flight work on it still completes; its result
    /// is simply no longer reachable.
    pub fn close(&self, id: Uuid) -> Result<()> {
        self.lock()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::SessionNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes sessions idle for at least `max_idle` that are not in the
    /// middle of a status update. Returns how many were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut guard = self.lock();
        let before = guard.len();
        guard.retain(|_, s| s.is_busy() || s.idle_for() < max_idle);
        before - guard.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Arc<DetailSession>>> {
        self.sessions.lock().expect("session registry mutex poisoned")
    }
}
