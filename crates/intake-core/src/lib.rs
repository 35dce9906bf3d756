//! Intake Core - staged document submission
//!
//! The orchestration layer of the intake system:
//! - Opens one [`SubmissionSession`] per `(activity, user)` pair
//! - Gates every attach through the content validator
//! - Commits staged batches through the two-phase
//!   publish-then-persist protocol with compensating rollback
//! - Sweeps idle sessions after their time-to-live
//!
//! # Example
//!
//! ```rust,ignore
//! use intake_core::prelude::*;
//!
//! # async fn example() -> Result<(), intake_core::IntakeError> {
//! let manager = SessionManager::new(store, coordinator, IntakeConfig::new());
//!
//! let activity = ActivityName::new("Bar Roma")?;
//! let session = manager.open(activity, "user-100").await?;
//! session.attach(DocumentKind::Cpi, "inspection text".into(), "annual".into()).await?;
//! let receipt = session.commit(&Author::new("user-100", "Giulia")).await?;
//!
//! println!("committed {} documents", receipt.items_committed);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod channel;
pub mod commit;
pub mod config;
pub mod error;
pub mod manager;
pub mod payroll;
pub mod repository;
pub mod session;
pub mod state;
pub mod telemetry;

// Re-exports for convenience
pub use channel::{ChannelPublisher, PublishError, PublishedBatch, RenderedBatch, RetractError};
pub use commit::{CommitCoordinator, CommitReceipt};
pub use config::IntakeConfig;
pub use error::IntakeError;
pub use manager::SessionManager;
pub use repository::{DocumentRepository, RepositoryError};
pub use session::SubmissionSession;
pub use state::SessionState;

// The document model is part of this crate's public API surface
pub use intake_document::{
    ActivityName, Author, ContentValidator, DocumentKind, DocumentRecord, SanctionRecord,
    StagedItem, ValidationError,
};
pub use intake_staging::{SessionKey, StagingError, StagingStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Intake Core
    pub use crate::{
        ActivityName, Author, ChannelPublisher, CommitCoordinator, CommitReceipt, DocumentKind,
        DocumentRepository, IntakeConfig, IntakeError, SessionManager, SessionState,
        SubmissionSession,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
