//! Testing utilities for the intake workspace
//!
//! Shared fakes and fixtures: a recording channel publisher and document
//! repository with scriptable failures, plus constructors for common test
//! values. The repository can also be gated to hold a `save_batch` in flight,
//! which is how the commit busy-guard is exercised.

#![allow(missing_docs)]

use async_trait::async_trait;
use intake_core::channel::{
    ChannelPublisher, PublishError, PublishedBatch, RenderedBatch, RetractError,
};
use intake_core::repository::{DocumentRepository, RepositoryError};
use intake_document::{
    ActivityName, Author, DocumentKind, DocumentRecord, SanctionRecord, StagedItem,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Fixtures

pub fn activity(name: &str) -> ActivityName {
    ActivityName::new(name).unwrap()
}

pub fn author() -> Author {
    Author::new("100", "Giulia")
}

pub fn staged_item(kind: DocumentKind, content: &str, context: &str) -> StagedItem {
    StagedItem::new(kind, content.as_bytes().to_vec(), context)
}

// ---------------------------------------------------------------------------
// Channel publisher fake

#[derive(Debug, Default)]
struct PublisherState {
    published: Mutex<Vec<RenderedBatch>>,
    fail_publishes: AtomicUsize,
    fail_retractions: AtomicBool,
    retractions: AtomicUsize,
}

/// Records every published batch and every retraction
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    state: Arc<PublisherState>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` publish calls
    pub fn fail_publishes(&self, n: usize) {
        self.state.fail_publishes.store(n, Ordering::SeqCst);
    }

    /// Make every retraction fail until reset
    pub fn fail_retractions(&self, fail: bool) {
        self.state.fail_retractions.store(fail, Ordering::SeqCst);
    }

    /// Every batch published so far, in publish order
    pub fn published(&self) -> Vec<RenderedBatch> {
        self.state.published.lock().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.state.published.lock().len()
    }

    pub fn retraction_count(&self) -> usize {
        self.state.retractions.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct RecordedHandle {
    batch_id: Uuid,
    state: Arc<PublisherState>,
}

#[async_trait]
impl PublishedBatch for RecordedHandle {
    async fn retract(&self) -> Result<(), RetractError> {
        if self.state.fail_retractions.load(Ordering::SeqCst) {
            return Err(RetractError::Unretractable(format!(
                "scripted retraction failure for {}",
                self.batch_id
            )));
        }
        self.state.retractions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ChannelPublisher for RecordingPublisher {
    async fn publish(
        &self,
        batch: RenderedBatch,
    ) -> Result<Box<dyn PublishedBatch>, PublishError> {
        let scripted_failure = self
            .state
            .fail_publishes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if scripted_failure {
            return Err(PublishError::Unavailable(
                "scripted publish failure".to_string(),
            ));
        }

        self.state.published.lock().push(batch);
        Ok(Box::new(RecordedHandle {
            batch_id: Uuid::new_v4(),
            state: Arc::clone(&self.state),
        }))
    }
}

// ---------------------------------------------------------------------------
// Document repository fake

#[derive(Debug, Default)]
struct RepositoryState {
    batches: Mutex<Vec<Vec<DocumentRecord>>>,
    sanctions: Mutex<Vec<SanctionRecord>>,
    fail_saves: AtomicUsize,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

/// Records every saved batch and sanction
#[derive(Debug, Clone, Default)]
pub struct RecordingRepository {
    state: Arc<RepositoryState>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` save calls
    pub fn fail_saves(&self, n: usize) {
        self.state.fail_saves.store(n, Ordering::SeqCst);
    }

    /// Block every save until a permit is added to the returned semaphore
    ///
    /// Lets a test hold a commit in the persistence phase while it probes the
    /// busy guard from another task.
    pub fn gate_saves(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.state.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Every batch saved so far, in save order
    pub fn saved_batches(&self) -> Vec<Vec<DocumentRecord>> {
        self.state.batches.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.state.batches.lock().len()
    }

    pub fn sanctions(&self) -> Vec<SanctionRecord> {
        self.state.sanctions.lock().clone()
    }

    async fn pass_gate(&self) {
        let gate = self.state.gate.lock().clone();
        if let Some(gate) = gate {
            let permit = gate.acquire().await.expect("gate semaphore closed");
            permit.forget();
        }
    }

    fn scripted_failure(&self) -> bool {
        self.state
            .fail_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl DocumentRepository for RecordingRepository {
    async fn save_batch(&self, records: Vec<DocumentRecord>) -> Result<(), RepositoryError> {
        self.pass_gate().await;
        if self.scripted_failure() {
            return Err(RepositoryError::WriteFailed(
                "scripted save failure".to_string(),
            ));
        }
        self.state.batches.lock().push(records);
        Ok(())
    }

    async fn save_sanction(&self, record: SanctionRecord) -> Result<(), RepositoryError> {
        self.pass_gate().await;
        if self.scripted_failure() {
            return Err(RepositoryError::WriteFailed(
                "scripted save failure".to_string(),
            ));
        }
        self.state.sanctions.lock().push(record);
        Ok(())
    }
}
