//! Submission sessions
//!
//! One [`SubmissionSession`] is one user's in-progress multi-document upload
//! for one activity. The session owns its staging key for its whole lifetime
//! and is the only writer of its staged items; the `Committing` guard keeps
//! commits from interleaving.

use crate::commit::{CommitCoordinator, CommitReceipt};
use crate::error::IntakeError;
use crate::state::{self, SessionState};
use chrono::{DateTime, Utc};
use intake_document::{ActivityName, Author, ContentValidator, DocumentKind, StagedItem};
use intake_staging::{SessionKey, StagingStore};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Inner {
    state: SessionState,
    item_count: usize,
    last_activity: Instant,
}

impl Inner {
    fn transition(&mut self, to: SessionState) {
        debug_assert!(
            state::allowed(self.state, to),
            "illegal session transition {:?} -> {to:?}",
            self.state,
        );
        self.state = to;
    }
}

/// One user's in-progress upload for one activity
///
/// Created through `SessionManager::open`, which guarantees at most one live
/// session per `(activity, user)` pair.
#[derive(Debug)]
pub struct SubmissionSession {
    key: SessionKey,
    activity: ActivityName,
    user_id: String,
    created_at: DateTime<Utc>,
    store: Arc<dyn StagingStore>,
    coordinator: Arc<CommitCoordinator>,
    validator: ContentValidator,
    ttl: Duration,
    // Held only for short, non-await critical sections
    inner: Mutex<Inner>,
}

impl SubmissionSession {
    pub(crate) fn new(
        key: SessionKey,
        activity: ActivityName,
        user_id: impl Into<String>,
        store: Arc<dyn StagingStore>,
        coordinator: Arc<CommitCoordinator>,
        validator: ContentValidator,
        ttl: Duration,
        initial_count: usize,
    ) -> Self {
        Self {
            key,
            activity,
            user_id: user_id.into(),
            created_at: Utc::now(),
            store,
            coordinator,
            validator,
            ttl,
            inner: Mutex::new(Inner {
                state: SessionState::Open,
                item_count: initial_count,
                last_activity: Instant::now(),
            }),
        }
    }

    /// Staging key of this session
    #[inline]
    #[must_use]
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Activity the session uploads to
    #[inline]
    #[must_use]
    pub fn activity(&self) -> &ActivityName {
        &self.activity
    }

    /// Owning user id
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// When the session was opened
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current lifecycle state
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Number of staged items, for UI progress display
    #[inline]
    #[must_use]
    pub fn current_count(&self) -> usize {
        self.inner.lock().item_count
    }

    /// Validate and stage one document
    ///
    /// Returns the new item count on success. Invalid content mutates
    /// nothing; a discard racing this call wins, and the attach surfaces
    /// [`IntakeError::SessionNotFound`].
    ///
    /// # Errors
    /// - [`IntakeError::Validation`] for rejected content
    /// - [`IntakeError::Busy`] while a commit is in flight
    /// - [`IntakeError::SessionNotFound`] for a closed session
    pub async fn attach(
        &self,
        kind: DocumentKind,
        content: String,
        context: String,
    ) -> Result<usize, IntakeError> {
        self.validator.validate(&content)?;
        match self.inner.lock().state {
            SessionState::Closed => return Err(IntakeError::SessionNotFound),
            SessionState::Committing => return Err(IntakeError::Busy),
            SessionState::Open => {}
        }

        let item = StagedItem::new(kind, content.into_bytes(), context);
        self.store.append(&self.key, item).await?;

        let mut inner = self.inner.lock();
        inner.item_count += 1;
        inner.last_activity = Instant::now();
        tracing::debug!(
            "attached {kind} document {} for {} by user {}",
            inner.item_count,
            self.activity,
            self.user_id
        );
        Ok(inner.item_count)
    }

    /// Commit the staged batch
    ///
    /// On success the staging session is destroyed and the session closes;
    /// any failure re-opens the session with every staged item intact, so the
    /// user can retry the commit or attach more.
    ///
    /// # Errors
    /// - [`IntakeError::Busy`] when a commit is already in flight
    /// - [`IntakeError::EmptyBatch`] with zero staged items
    /// - [`IntakeError::SessionNotFound`] for a closed session
    /// - delivery/persistence failures from the coordinator
    pub async fn commit(&self, author: &Author) -> Result<CommitReceipt, IntakeError> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                SessionState::Closed => return Err(IntakeError::SessionNotFound),
                SessionState::Committing => return Err(IntakeError::Busy),
                SessionState::Open => {}
            }
            if inner.item_count == 0 {
                return Err(IntakeError::EmptyBatch);
            }
            inner.transition(SessionState::Committing);
            inner.last_activity = Instant::now();
        }

        match self.run_commit(author).await {
            Ok(receipt) => {
                self.inner.lock().transition(SessionState::Closed);
                Ok(receipt)
            }
            Err(err) => {
                let mut inner = self.inner.lock();
                if inner.state == SessionState::Committing {
                    inner.transition(SessionState::Open);
                    inner.last_activity = Instant::now();
                }
                Err(err)
            }
        }
    }

    async fn run_commit(&self, author: &Author) -> Result<CommitReceipt, IntakeError> {
        // The store, not the in-memory counter, is the source of truth for
        // what gets committed
        let items = self.store.list(&self.key).await?;
        let receipt = self
            .coordinator
            .commit(&items, &self.activity, author)
            .await?;

        if let Err(err) = self.store.destroy(&self.key).await {
            // The batch is delivered and persisted; a leaked staging
            // directory is the TTL sweep's problem, not the user's
            tracing::warn!("staging cleanup failed after commit of {}: {err}", self.key);
        }
        Ok(receipt)
    }

    /// Discard the session and drop every staged item
    ///
    /// Idempotent. During an in-flight commit the call is ignored; the
    /// commit's outcome decides the terminal state.
    pub async fn discard(&self) {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                SessionState::Closed => return,
                SessionState::Committing => {
                    tracing::debug!("discard ignored during in-flight commit of {}", self.key);
                    return;
                }
                SessionState::Open => inner.transition(SessionState::Closed),
            }
        }
        if let Err(err) = self.store.destroy(&self.key).await {
            tracing::warn!("staging cleanup failed for discarded {}: {err}", self.key);
        }
        tracing::info!(
            "discarded session for {} by user {}",
            self.activity,
            self.user_id
        );
    }

    /// Discard the session when idle past its time-to-live
    ///
    /// Returns whether a discard was initiated.
    pub async fn expire_if_idle(&self, now: Instant) -> bool {
        {
            let inner = self.inner.lock();
            if inner.state != SessionState::Open {
                return false;
            }
            if now.saturating_duration_since(inner.last_activity) < self.ttl {
                return false;
            }
        }
        tracing::info!(
            "session for {} by user {} expired after inactivity",
            self.activity,
            self.user_id
        );
        self.discard().await;
        true
    }
}
