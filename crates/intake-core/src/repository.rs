//! Long-term document store seam

use intake_document::{DocumentRecord, SanctionRecord};

/// Errors raised by the long-term store
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The store could not be reached
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The write was attempted and failed
    #[error("document store write failed: {0}")]
    WriteFailed(String),
}

/// Long-term store of finalized documents
///
/// # Contract
/// `save_batch` is all-or-nothing from the caller's perspective: on `Ok` every
/// record is durably recorded, on `Err` none is. The commit protocol's
/// compensation logic depends on this.
#[async_trait::async_trait]
pub trait DocumentRepository: Send + Sync + std::fmt::Debug {
    /// Persist a finalized batch in one atomic call
    async fn save_batch(&self, records: Vec<DocumentRecord>) -> Result<(), RepositoryError>;

    /// Persist a single sanction
    async fn save_sanction(&self, record: SanctionRecord) -> Result<(), RepositoryError>;
}
