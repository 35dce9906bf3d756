//! Staged items and finalized records
//!
//! A [`StagedItem`] lives in the staging area while a submission is being
//! assembled; a [`DocumentRecord`] is the finalized form handed to the
//! long-term repository on commit. Items are immutable once appended - the
//! staging area only ever appends or bulk-discards.

use crate::kind::DocumentKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The submitting user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Platform user identifier
    pub id: String,
    /// Display name at submission time
    pub display_name: String,
}

impl Author {
    /// Create a new author reference
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Error returned for an empty or all-whitespace activity name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("activity name must not be empty")]
pub struct InvalidActivityName;

/// Name of the activity a batch of documents is attributed to
///
/// # Invariants
/// - Never empty or all-whitespace (checked at construction)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActivityName(String);

impl ActivityName {
    /// Create a validated activity name
    ///
    /// # Errors
    /// Returns [`InvalidActivityName`] for empty or all-whitespace input
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidActivityName> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidActivityName);
        }
        Ok(Self(name))
    }

    /// The name as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActivityName {
    type Error = InvalidActivityName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActivityName> for String {
    fn from(value: ActivityName) -> Self {
        value.0
    }
}

impl fmt::Display for ActivityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One not-yet-committed document held in a staging session
///
/// Sequence position is the order the staging store returns; items are never
/// edited or reordered after append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedItem {
    /// Type tag picked in the attach step
    pub kind: DocumentKind,
    /// Raw content bytes
    pub content: Vec<u8>,
    /// Free-text context supplied alongside the content
    pub context: String,
    /// When the item was attached
    pub attached_at: DateTime<Utc>,
}

impl StagedItem {
    /// Create a staged item stamped with the current time
    ///
    /// Content acceptance is the session's concern; this constructor does not
    /// validate.
    #[inline]
    #[must_use]
    pub fn new(kind: DocumentKind, content: Vec<u8>, context: impl Into<String>) -> Self {
        Self {
            kind,
            content,
            context: context.into(),
            attached_at: Utc::now(),
        }
    }

    /// Same as [`StagedItem::new`] with an explicit attach time
    #[inline]
    #[must_use]
    pub fn with_attached_at(mut self, attached_at: DateTime<Utc>) -> Self {
        self.attached_at = attached_at;
        self
    }
}

/// Finalized document as handed to the long-term repository
///
/// Created only by a successful commit; creation time is assigned by the
/// store, not carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Activity the document is attributed to
    pub activity: ActivityName,
    /// Type tag
    pub kind: DocumentKind,
    /// Content bytes
    pub content: Vec<u8>,
    /// Free-text context
    pub context: String,
    /// Submitting user id
    pub author_id: String,
    /// Submitting user display name
    pub author_name: String,
}

impl DocumentRecord {
    /// Build the finalized record for one staged item
    #[must_use]
    pub fn from_staged(item: &StagedItem, activity: &ActivityName, author: &Author) -> Self {
        Self {
            activity: activity.clone(),
            kind: item.kind,
            content: item.content.clone(),
            context: item.context.clone(),
            author_id: author.id.clone(),
            author_name: author.display_name.clone(),
        }
    }
}

/// Sanction applied to an activity
///
/// Single-shot record: sanctions are never staged, they go straight through
/// the commit protocol as a one-element batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionRecord {
    /// Activity being sanctioned
    pub activity: ActivityName,
    /// Reason for the sanction
    pub reason: String,
    /// Sanction text
    pub sanction_text: String,
    /// Issuing user id
    pub author_id: String,
    /// Issuing user display name
    pub author_name: String,
}

impl SanctionRecord {
    /// Create a sanction record
    #[must_use]
    pub fn new(
        activity: ActivityName,
        reason: impl Into<String>,
        sanction_text: impl Into<String>,
        author: &Author,
    ) -> Self {
        Self {
            activity,
            reason: reason.into(),
            sanction_text: sanction_text.into(),
            author_id: author.id.clone(),
            author_name: author.display_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_name_rejects_empty() {
        assert_eq!(ActivityName::new(""), Err(InvalidActivityName));
        assert_eq!(ActivityName::new("   "), Err(InvalidActivityName));
        assert_eq!(ActivityName::new("\t\n"), Err(InvalidActivityName));
    }

    #[test]
    fn activity_name_accepts_real_names() {
        let name = ActivityName::new("Bar Roma").unwrap();
        assert_eq!(name.as_str(), "Bar Roma");
        assert_eq!(name.to_string(), "Bar Roma");
    }

    #[test]
    fn record_carries_item_and_author_fields() {
        let activity = ActivityName::new("Pizzeria Da Mario").unwrap();
        let author = Author::new("42", "mario");
        let item = StagedItem::new(DocumentKind::Haccp, b"report body".to_vec(), "monthly check");

        let record = DocumentRecord::from_staged(&item, &activity, &author);
        assert_eq!(record.activity, activity);
        assert_eq!(record.kind, DocumentKind::Haccp);
        assert_eq!(record.content, b"report body");
        assert_eq!(record.context, "monthly check");
        assert_eq!(record.author_id, "42");
        assert_eq!(record.author_name, "mario");
    }

    #[test]
    fn sanction_record_copies_author() {
        let activity = ActivityName::new("Club Nettuno").unwrap();
        let author = Author::new("7", "admin");
        let record = SanctionRecord::new(activity, "noise", "3 day closure", &author);
        assert_eq!(record.author_id, "7");
        assert_eq!(record.author_name, "admin");
        assert_eq!(record.reason, "noise");
    }
}
