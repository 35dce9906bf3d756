//! Error taxonomy for the intake core
//!
//! Every failure is caught at the session boundary and turned into an
//! [`IntakeError`]; nothing propagates as an unhandled fault to the platform
//! layer. Each variant leaves the session either usable or cleanly destroyed,
//! so the whole taxonomy is recoverable from the user's point of view.

use crate::channel::PublishError;
use crate::repository::RepositoryError;
use intake_document::ValidationError;
use intake_staging::StagingError;

/// Main intake error type
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// Rejected content; the user retries the same attach step
    #[error("invalid content: {0}")]
    Validation(#[from] ValidationError),

    /// Operation against a destroyed or never-opened session
    #[error("submission session not found")]
    SessionNotFound,

    /// A commit is already in flight for this session
    #[error("commit already in flight")]
    Busy,

    /// Commit attempted with zero staged items
    #[error("nothing to submit")]
    EmptyBatch,

    /// Channel publish failed; staged items are untouched
    #[error("channel delivery failed: {0}")]
    DeliveryFailed(#[source] PublishError),

    /// Store write failed after a successful publish
    ///
    /// When `retraction_failed` is set the published batch could not be
    /// deleted either, leaving a published-but-unpersisted artifact that
    /// needs manual reconciliation.
    #[error("persistence failed after publish: {source}")]
    PersistenceFailed {
        /// The store failure
        #[source]
        source: RepositoryError,
        /// Whether the compensating retraction also failed
        retraction_failed: bool,
    },

    /// Staging backend failure other than a missing session
    #[error("staging failure: {0}")]
    Staging(#[source] StagingError),
}

impl From<StagingError> for IntakeError {
    fn from(value: StagingError) -> Self {
        match value {
            StagingError::SessionNotFound => IntakeError::SessionNotFound,
            other => IntakeError::Staging(other),
        }
    }
}

impl IntakeError {
    /// Check whether the user can recover by retrying or re-issuing a command
    ///
    /// There is no unrecoverable, user-facing terminal error in this core;
    /// the match is spelled out so a new variant forces a decision here.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            IntakeError::Validation(_) => true,
            IntakeError::SessionNotFound => true,
            IntakeError::Busy => true,
            IntakeError::EmptyBatch => true,
            IntakeError::DeliveryFailed(_) => true,
            IntakeError::PersistenceFailed { .. } => true,
            IntakeError::Staging(_) => true,
        }
    }

    /// Check whether a human operator must reconcile channel and store
    #[inline]
    #[must_use]
    pub fn requires_reconciliation(&self) -> bool {
        matches!(
            self,
            IntakeError::PersistenceFailed {
                retraction_failed: true,
                ..
            }
        )
    }

    /// Localized, generic message safe to show the user
    ///
    /// Never leaks internal detail; always tells the user whether and how to
    /// try again.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            IntakeError::Validation(_) => "Contenuto del documento non valido. Riprova.",
            IntakeError::SessionNotFound => {
                "Sessione scaduta o inesistente. Usa di nuovo il comando per ricominciare."
            }
            IntakeError::Busy => "Invio già in corso. Attendi un momento.",
            IntakeError::EmptyBatch => "Allega almeno un documento prima di inviare!",
            IntakeError::DeliveryFailed(_) => "Impossibile inviare i documenti. Riprova.",
            IntakeError::PersistenceFailed { .. } => {
                "Si è verificato un errore durante il salvataggio. Riprova."
            }
            IntakeError::Staging(_) => "Si è verificato un errore. Riprova più tardi.",
        }
    }
}
