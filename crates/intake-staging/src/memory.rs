//! In-memory staging backend

use crate::key::SessionKey;
use crate::store::{StagingError, StagingStore};
use dashmap::DashMap;
use intake_document::StagedItem;

/// Process-memory staging store
///
/// Sharded per key via `DashMap`, so sessions never contend with each other.
/// Items are lost on process restart; `destroy` (or the session TTL sweep)
/// is what bounds memory across many abandoned sessions.
#[derive(Debug, Default)]
pub struct MemoryStagingStore {
    sessions: DashMap<SessionKey, Vec<StagedItem>>,
}

impl MemoryStagingStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open sessions
    #[inline]
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait::async_trait]
impl StagingStore for MemoryStagingStore {
    async fn open_session(&self, key: &SessionKey) -> Result<(), StagingError> {
        self.sessions.entry(key.clone()).or_default();
        Ok(())
    }

    async fn append(&self, key: &SessionKey, item: StagedItem) -> Result<(), StagingError> {
        match self.sessions.get_mut(key) {
            Some(mut items) => {
                items.push(item);
                Ok(())
            }
            None => Err(StagingError::SessionNotFound),
        }
    }

    async fn list(&self, key: &SessionKey) -> Result<Vec<StagedItem>, StagingError> {
        self.sessions
            .get(key)
            .map(|items| items.clone())
            .ok_or(StagingError::SessionNotFound)
    }

    async fn destroy(&self, key: &SessionKey) -> Result<(), StagingError> {
        self.sessions.remove(key);
        Ok(())
    }
}
