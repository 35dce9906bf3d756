//! Session registry
//!
//! The process-wide owner of open submission sessions. Replaces any
//! module-level container: the staging store, the coordinator, and the
//! configuration are all injected, and the registry is keyed by the full
//! `(activity, user)` derived key so different users on one activity can
//! never collide.

use crate::commit::{CommitCoordinator, CommitReceipt};
use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::session::SubmissionSession;
use crate::state::SessionState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use intake_document::{ActivityName, Author, DocumentKind, SanctionRecord, StagedItem};
use intake_staging::{SessionKey, StagingStore};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Registry of open submission sessions
#[derive(Debug)]
pub struct SessionManager {
    sessions: DashMap<SessionKey, Arc<SubmissionSession>>,
    store: Arc<dyn StagingStore>,
    coordinator: Arc<CommitCoordinator>,
    config: IntakeConfig,
}

impl SessionManager {
    /// Create a manager over an injected store and coordinator
    #[inline]
    #[must_use]
    pub fn new(
        store: Arc<dyn StagingStore>,
        coordinator: Arc<CommitCoordinator>,
        config: IntakeConfig,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            store,
            coordinator,
            config,
        }
    }

    /// Open (or resume) the session for one `(activity, user)` pair
    ///
    /// At most one live session exists per pair: a second open while the
    /// first is still in progress returns the existing session with its
    /// staged items, never a shadow session. A closed leftover entry is
    /// replaced with a fresh session.
    ///
    /// # Errors
    /// Returns staging failures from opening the backing session
    pub async fn open(
        &self,
        activity: ActivityName,
        user_id: &str,
    ) -> Result<Arc<SubmissionSession>, IntakeError> {
        let key = SessionKey::derive(&activity, user_id);

        // Idempotent on the backing store: re-opening a live key never
        // clobbers staged items
        self.store.open_session(&key).await?;
        // A durable backend may already hold items from before a restart;
        // the session's counter must agree with the store
        let initial_count = self.store.list(&key).await?.len();

        let session = match self.sessions.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().state() == SessionState::Closed {
                    let fresh = self.make_session(key, activity, user_id, initial_count);
                    entry.insert(Arc::clone(&fresh));
                    fresh
                } else {
                    Arc::clone(entry.get())
                }
            }
            Entry::Vacant(entry) => {
                let fresh = self.make_session(key, activity, user_id, initial_count);
                entry.insert(Arc::clone(&fresh));
                fresh
            }
        };
        Ok(session)
    }

    fn make_session(
        &self,
        key: SessionKey,
        activity: ActivityName,
        user_id: &str,
        initial_count: usize,
    ) -> Arc<SubmissionSession> {
        tracing::info!("opening session for {activity} by user {user_id}");
        Arc::new(SubmissionSession::new(
            key,
            activity,
            user_id,
            Arc::clone(&self.store),
            Arc::clone(&self.coordinator),
            self.config.validator(),
            self.config.session_ttl(),
            initial_count,
        ))
    }

    /// Discard every session idle past the TTL and reap closed entries
    ///
    /// Returns how many sessions were expired this sweep.
    pub async fn expire_idle(&self) -> usize {
        let now = Instant::now();
        let sessions: Vec<Arc<SubmissionSession>> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let expirations =
            futures::future::join_all(sessions.iter().map(|s| s.expire_if_idle(now))).await;
        let expired = expirations.into_iter().filter(|e| *e).count();

        self.sessions
            .retain(|_, session| session.state() != SessionState::Closed);
        if expired > 0 {
            tracing::info!("expired {expired} idle sessions");
        }
        expired
    }

    /// Spawn a background task sweeping idle sessions every `interval`
    ///
    /// Runs until the returned handle is aborted.
    #[must_use]
    pub fn spawn_expiry_sweep(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                manager.expire_idle().await;
            }
        })
    }

    /// Number of live (non-closed) sessions
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| entry.value().state() != SessionState::Closed)
            .count()
    }

    /// Single-shot upload: validate and commit one document without staging
    ///
    /// Used by the one-command upload paths (inspection reports, generic
    /// attachments); does not interact with any open session for the pair.
    ///
    /// # Errors
    /// Validation and commit failures, as for the staged path
    pub async fn submit_single(
        &self,
        activity: ActivityName,
        author: &Author,
        kind: DocumentKind,
        content: String,
        context: String,
    ) -> Result<CommitReceipt, IntakeError> {
        self.config.validator().validate(&content)?;
        let item = StagedItem::new(kind, content.into_bytes(), context);
        self.coordinator.commit_single(item, &activity, author).await
    }

    /// Publish and persist a sanction
    ///
    /// # Errors
    /// Delivery and persistence failures, as for the staged path
    pub async fn record_sanction(&self, record: SanctionRecord) -> Result<(), IntakeError> {
        self.coordinator.record_sanction(record).await
    }
}
