//! Batch commit protocol
//!
//! Two-phase hand-off with compensation:
//! 1. Publish the rendered batch to the channel as one unit, keeping the
//!    retractable handle.
//! 2. Persist the batch in one `save_batch` call.
//! 3. On persistence failure, retract the published batch; a failed
//!    retraction is escalated in the error but never masks the original
//!    failure.
//!
//! Publish-before-persist keeps the compensating action (message deletion)
//! simple and always attemptable, and minimizes the window where a user sees
//! success with no durable record behind it.

use crate::channel::{ChannelPublisher, PublishedBatch, RenderedBatch};
use crate::error::IntakeError;
use crate::repository::DocumentRepository;
use chrono::Utc;
use intake_document::{
    render_document, render_sanction, ActivityName, Author, DocumentRecord, SanctionRecord,
    StagedItem,
};
use std::sync::Arc;

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    /// How many documents were delivered and persisted
    pub items_committed: usize,
}

/// Executes the all-or-nothing batch hand-off
#[derive(Debug, Clone)]
pub struct CommitCoordinator {
    publisher: Arc<dyn ChannelPublisher>,
    repository: Arc<dyn DocumentRepository>,
}

impl CommitCoordinator {
    /// Create a coordinator over the two collaborators
    #[inline]
    #[must_use]
    pub fn new(
        publisher: Arc<dyn ChannelPublisher>,
        repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            publisher,
            repository,
        }
    }

    /// Commit a staged batch
    ///
    /// # Errors
    /// - [`IntakeError::EmptyBatch`] for zero items
    /// - [`IntakeError::DeliveryFailed`] when the publish fails; nothing else
    ///   was attempted and the staged items are untouched
    /// - [`IntakeError::PersistenceFailed`] when the store write fails after
    ///   a successful publish; the published batch has been retracted unless
    ///   `retraction_failed` says otherwise
    pub async fn commit(
        &self,
        items: &[StagedItem],
        activity: &ActivityName,
        author: &Author,
    ) -> Result<CommitReceipt, IntakeError> {
        if items.is_empty() {
            return Err(IntakeError::EmptyBatch);
        }

        let now = Utc::now();
        let batch = RenderedBatch {
            activity: activity.clone(),
            documents: items
                .iter()
                .map(|item| render_document(item, activity, author, now))
                .collect(),
        };

        let handle = self
            .publisher
            .publish(batch)
            .await
            .map_err(IntakeError::DeliveryFailed)?;
        tracing::debug!("published batch of {} for {}", items.len(), activity);

        let records = items
            .iter()
            .map(|item| DocumentRecord::from_staged(item, activity, author))
            .collect();
        match self.repository.save_batch(records).await {
            Ok(()) => {
                tracing::info!(
                    "committed {} documents for {} by {}",
                    items.len(),
                    activity,
                    author.display_name
                );
                Ok(CommitReceipt {
                    items_committed: items.len(),
                })
            }
            Err(source) => self.compensate(handle, source, activity).await,
        }
    }

    /// Single-shot upload: one document straight through the batch protocol
    pub async fn commit_single(
        &self,
        item: StagedItem,
        activity: &ActivityName,
        author: &Author,
    ) -> Result<CommitReceipt, IntakeError> {
        self.commit(std::slice::from_ref(&item), activity, author)
            .await
    }

    /// Publish and persist a sanction through the same two-phase protocol
    pub async fn record_sanction(&self, record: SanctionRecord) -> Result<(), IntakeError> {
        let batch = RenderedBatch {
            activity: record.activity.clone(),
            documents: vec![render_sanction(&record, Utc::now())],
        };
        let handle = self
            .publisher
            .publish(batch)
            .await
            .map_err(IntakeError::DeliveryFailed)?;

        let activity = record.activity.clone();
        match self.repository.save_sanction(record).await {
            Ok(()) => {
                tracing::info!("recorded sanction for {activity}");
                Ok(())
            }
            Err(source) => self.compensate(handle, source, &activity).await.map(|_| ()),
        }
    }

    /// Retract the published batch after a persistence failure
    async fn compensate(
        &self,
        handle: Box<dyn PublishedBatch>,
        source: crate::repository::RepositoryError,
        activity: &ActivityName,
    ) -> Result<CommitReceipt, IntakeError> {
        tracing::warn!("persistence failed for {activity}, retracting published batch: {source}");
        let retraction_failed = match handle.retract().await {
            Ok(()) => false,
            Err(retract_err) => {
                // Dual failure: a published-but-unpersisted artifact may
                // exist in the channel
                tracing::error!(
                    "retraction failed for {activity} after persistence failure, \
                     manual reconciliation required: {retract_err}"
                );
                true
            }
        };
        Err(IntakeError::PersistenceFailed {
            source,
            retraction_failed,
        })
    }
}
