//! The staging store trait

use crate::key::SessionKey;
use intake_document::StagedItem;

/// Errors raised by staging backends
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    /// The key was never opened or was already destroyed
    #[error("staging session not found")]
    SessionNotFound,

    /// Backing storage I/O failure
    #[error("staging storage failure: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar metadata could not be read back
    #[error("staging metadata corrupt: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Key/value staging area for in-progress submissions
///
/// # Contract
/// - `open_session` is idempotent: a second open of a live key is a no-op and
///   never clobbers staged items.
/// - `append`/`list` against a missing key fail with
///   [`StagingError::SessionNotFound`]; `list` of an opened-but-empty session
///   returns an empty vec, not an error.
/// - `destroy` is idempotent and fully reclaims backing resources; destroying
///   a missing key succeeds.
/// - Per-key isolation only: operations on different keys never block each
///   other, and `append`/`destroy` are atomic with respect to `list` on the
///   same key.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync + std::fmt::Debug {
    /// Create an empty staging session if none exists for `key`
    async fn open_session(&self, key: &SessionKey) -> Result<(), StagingError>;

    /// Append one item to an open session
    async fn append(&self, key: &SessionKey, item: StagedItem) -> Result<(), StagingError>;

    /// All staged items in attach order
    async fn list(&self, key: &SessionKey) -> Result<Vec<StagedItem>, StagingError>;

    /// Drop the session and reclaim its storage
    async fn destroy(&self, key: &SessionKey) -> Result<(), StagingError>;
}
