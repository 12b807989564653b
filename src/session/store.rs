use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use super::SessionData;

/// In-memory session store, shared across workers.
///
/// Entries are keyed by the session id carried (signed) in the client cookie.
/// Requests for different sessions never contend beyond the map lock itself.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionData>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot of the session data for `id`, if the store knows it.
    pub fn load(&self, id: &Uuid) -> Option<SessionData> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Inserts or replaces the record for `id`.
    pub fn save(&self, id: Uuid, data: SessionData) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, data);
    }

    /// Drops the record for `id`, returning it if present.
    pub fn remove(&self, id: &Uuid) -> Option<SessionData> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
