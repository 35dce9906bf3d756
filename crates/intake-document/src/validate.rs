//! Content acceptance gate for the attach flow
//!
//! Rejected content is never appended to a staging session, so every check
//! lives here rather than in the session itself.

/// Errors for rejected content
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Empty or all-whitespace content
    #[error("content is empty")]
    Empty,

    /// Content exceeds the configured ceiling
    #[error("content is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Submitted size in bytes
        size: usize,
        /// Configured ceiling in bytes
        limit: usize,
    },
}

/// Validates submitted document content
///
/// Empty and all-whitespace input is always rejected regardless of
/// configuration. The size ceiling matches the interactive input control's
/// limit by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentValidator {
    max_bytes: usize,
}

impl ContentValidator {
    /// Default content ceiling in bytes
    pub const DEFAULT_MAX_BYTES: usize = 2000;

    /// Create a validator with a custom size ceiling
    #[inline]
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Configured ceiling in bytes
    #[inline]
    #[must_use]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check whether content is acceptable
    ///
    /// # Errors
    /// - [`ValidationError::Empty`] for empty or all-whitespace input
    /// - [`ValidationError::TooLarge`] when the byte length exceeds the ceiling
    pub fn validate(&self, content: &str) -> Result<(), ValidationError> {
        if content.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        if content.len() > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size: content.len(),
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_BYTES)
    }
}
