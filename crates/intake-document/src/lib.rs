//! Document model for the intake system
//!
//! Leaf crate shared by the staging and orchestration layers:
//! - Document type tags and their wire labels
//! - Staged items and finalized records
//! - Content validation (the acceptance gate for the attach flow)
//! - Pure display rendering (embeds, attachment filenames)

pub mod embed;
pub mod item;
pub mod kind;
pub mod validate;

// Re-exports for convenience
pub use embed::{
    render_document, render_sanction, safe_filename, DocumentAttachment, DocumentEmbed,
    EmbedField, RenderedDocument,
};
pub use item::{
    ActivityName, Author, DocumentRecord, InvalidActivityName, SanctionRecord, StagedItem,
};
pub use kind::{DocumentKind, ParseDocumentKindError};
pub use validate::{ContentValidator, ValidationError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
