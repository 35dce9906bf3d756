//! Staging-area storage
//!
//! Holds the not-yet-committed items of every open submission session behind
//! the [`StagingStore`] trait:
//! - [`MemoryStagingStore`] keeps items in process memory (fast, lost on
//!   restart)
//! - [`FsStagingStore`] keeps one directory per session on disk (survives
//!   restart, needs explicit cleanup - which `destroy` guarantees)
//!
//! Sessions are addressed by a [`SessionKey`] derived from the activity name
//! AND the submitting user, so two users uploading to the same activity can
//! never observe each other's staged items.

pub mod fs;
pub mod key;
pub mod memory;
pub mod store;

pub use fs::FsStagingStore;
pub use key::SessionKey;
pub use memory::MemoryStagingStore;
pub use store::{StagingError, StagingStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
