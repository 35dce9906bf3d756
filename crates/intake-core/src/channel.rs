//! Channel delivery seam
//!
//! The core never talks to the chat platform directly. It hands a fully
//! rendered batch to a [`ChannelPublisher`] and gets back a retractable
//! handle, which is what makes the compensating rollback in the commit
//! protocol a first-class, testable operation rather than an inline
//! best-effort delete.

use intake_document::{ActivityName, RenderedDocument};

/// A rendered batch delivered to the destination channel as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBatch {
    /// Activity the batch belongs to
    pub activity: ActivityName,
    /// Rendered documents in attach order
    pub documents: Vec<RenderedDocument>,
}

impl RenderedBatch {
    /// Number of documents in the batch
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the batch holds no documents
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Errors raised while publishing a batch
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The channel could not be reached
    #[error("channel unavailable: {0}")]
    Unavailable(String),

    /// The channel refused the batch
    #[error("channel rejected the batch: {0}")]
    Rejected(String),
}

/// Errors raised while retracting a published batch
#[derive(Debug, thiserror::Error)]
pub enum RetractError {
    /// The published messages can no longer be deleted
    #[error("published batch is no longer retractable: {0}")]
    Unretractable(String),
}

/// Handle to a batch that has been delivered to the channel
///
/// Retraction is best-effort message deletion, used as the compensating
/// action when persistence fails after a successful publish.
#[async_trait::async_trait]
pub trait PublishedBatch: Send + Sync + std::fmt::Debug {
    /// Delete the published batch from the channel
    async fn retract(&self) -> Result<(), RetractError>;
}

/// Delivers rendered batches to the destination channel
#[async_trait::async_trait]
pub trait ChannelPublisher: Send + Sync + std::fmt::Debug {
    /// Publish the whole batch as one unit
    async fn publish(
        &self,
        batch: RenderedBatch,
    ) -> Result<Box<dyn PublishedBatch>, PublishError>;
}
