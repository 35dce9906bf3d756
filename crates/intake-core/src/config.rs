//! Intake configuration

use intake_document::ContentValidator;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the intake core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Seconds of inactivity after which an open session is discarded
    ///
    /// The default matches the interactive control's visibility window.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Byte ceiling for one document's content
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,
    /// Root directory for the filesystem staging backend
    #[serde(default = "default_staging_root")]
    pub staging_root: PathBuf,
}

fn default_session_ttl_secs() -> u64 {
    180
}

fn default_max_content_bytes() -> usize {
    ContentValidator::DEFAULT_MAX_BYTES
}

fn default_staging_root() -> PathBuf {
    PathBuf::from("document_storage")
}

impl IntakeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a session time-to-live in seconds
    #[inline]
    #[must_use]
    pub fn with_session_ttl_secs(mut self, secs: u64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    /// With a content byte ceiling
    #[inline]
    #[must_use]
    pub fn with_max_content_bytes(mut self, max: usize) -> Self {
        self.max_content_bytes = max;
        self
    }

    /// With a staging root directory
    #[inline]
    #[must_use]
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// Session time-to-live as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Content validator configured from this config
    #[inline]
    #[must_use]
    pub fn validator(&self) -> ContentValidator {
        ContentValidator::new(self.max_content_bytes)
    }

    /// Parse a configuration from a TOML document
    ///
    /// Missing fields fall back to their defaults, so an embedding bot can
    /// carry only the keys it overrides.
    ///
    /// # Errors
    /// Returns the TOML parse error for malformed input
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl_secs(),
            max_content_bytes: default_max_content_bytes(),
            staging_root: default_staging_root(),
        }
    }
}
