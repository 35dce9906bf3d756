//! Document type tags
//!
//! Every staged item carries exactly one tag from this fixed set. The wire
//! labels are what the interactive type-selection menu shows and what the
//! staging sidecar records, so they must stay stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Periodic inspection report (CPI)
    #[serde(rename = "CPI")]
    Cpi,
    /// HACCP compliance record
    #[serde(rename = "HACCP")]
    Haccp,
    /// Alcohol sales licence
    #[serde(rename = "Lic.Alcohol")]
    AlcoholLicense,
    /// Food-truck operating permit
    #[serde(rename = "Mod.FoodTruck")]
    FoodTruckPermit,
    /// Private security licence
    #[serde(rename = "Lic.Security")]
    SecurityLicense,
    /// Anything that does not fit the categories above
    #[serde(rename = "Other")]
    Other,
}

impl DocumentKind {
    /// All tags, in menu order
    pub const ALL: [DocumentKind; 6] = [
        DocumentKind::Cpi,
        DocumentKind::Haccp,
        DocumentKind::AlcoholLicense,
        DocumentKind::FoodTruckPermit,
        DocumentKind::SecurityLicense,
        DocumentKind::Other,
    ];

    /// Wire label for this tag
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Cpi => "CPI",
            DocumentKind::Haccp => "HACCP",
            DocumentKind::AlcoholLicense => "Lic.Alcohol",
            DocumentKind::FoodTruckPermit => "Mod.FoodTruck",
            DocumentKind::SecurityLicense => "Lic.Security",
            DocumentKind::Other => "Other",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document kind: {0}")]
pub struct ParseDocumentKindError(pub String);

impl FromStr for DocumentKind {
    type Err = ParseDocumentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| ParseDocumentKindError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips_through_from_str() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.label().parse::<DocumentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "Lic.Unknown".parse::<DocumentKind>().unwrap_err();
        assert_eq!(err, ParseDocumentKindError("Lic.Unknown".to_string()));
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(DocumentKind::AlcoholLicense.to_string(), "Lic.Alcohol");
        assert_eq!(DocumentKind::Other.to_string(), "Other");
    }

    #[test]
    fn all_contains_every_tag_once() {
        let mut labels: Vec<&str> = DocumentKind::ALL.iter().map(DocumentKind::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), DocumentKind::ALL.len());
    }
}
