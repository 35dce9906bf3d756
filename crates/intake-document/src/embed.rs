//! Display rendering
//!
//! Pure item+metadata -> display record functions. The platform layer turns
//! these into real chat embeds and file uploads; nothing here talks to the
//! network, so the commit protocol can render a whole batch before publishing
//! anything.

use crate::item::{ActivityName, Author, SanctionRecord, StagedItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One name/value field on an embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field label
    pub name: String,
    /// Field value
    pub value: String,
}

/// Platform-agnostic embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEmbed {
    /// Embed title
    pub title: String,
    /// Embed body
    pub description: String,
    /// Display name shown as the embed author
    pub author_name: String,
    /// Extra fields, in display order
    pub fields: Vec<EmbedField>,
    /// Render timestamp
    pub timestamp: DateTime<Utc>,
}

/// File attached next to an embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAttachment {
    /// Sanitized filename
    pub filename: String,
    /// File bytes
    pub content: Vec<u8>,
}

/// One fully rendered document, ready for the channel publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// The embed to display
    pub embed: DocumentEmbed,
    /// Attachment, absent for text-only records such as sanctions
    pub attachment: Option<DocumentAttachment>,
}

/// Render one staged item for channel delivery
#[must_use]
pub fn render_document(
    item: &StagedItem,
    activity: &ActivityName,
    author: &Author,
    at: DateTime<Utc>,
) -> RenderedDocument {
    let embed = DocumentEmbed {
        title: format!("{} per {activity}", item.kind),
        description: item.context.clone(),
        author_name: author.display_name.clone(),
        fields: vec![EmbedField {
            name: "Caricato da".to_string(),
            value: author.display_name.clone(),
        }],
        timestamp: at,
    };
    RenderedDocument {
        embed,
        attachment: Some(DocumentAttachment {
            filename: safe_filename(activity, item.kind.label(), at),
            content: item.content.clone(),
        }),
    }
}

/// Render a sanction for channel delivery (text-only, no attachment)
#[must_use]
pub fn render_sanction(record: &SanctionRecord, at: DateTime<Utc>) -> RenderedDocument {
    let embed = DocumentEmbed {
        title: format!("Sanzione per {}", record.activity),
        description: String::new(),
        author_name: record.author_name.clone(),
        fields: vec![
            EmbedField {
                name: "Motivo".to_string(),
                value: record.reason.clone(),
            },
            EmbedField {
                name: "Sanzione".to_string(),
                value: record.sanction_text.clone(),
            },
        ],
        timestamp: at,
    };
    RenderedDocument {
        embed,
        attachment: None,
    }
}

/// Timestamped attachment filename, filtered to characters every chat
/// platform accepts (alphanumerics plus `.`, `_`, `-`)
#[must_use]
pub fn safe_filename(activity: &ActivityName, tag: &str, at: DateTime<Utc>) -> String {
    let stamp = at.format("%Y%m%d_%H%M%S");
    let raw = format!("{tag}_{activity}_{stamp}.txt");
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}
