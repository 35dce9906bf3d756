//! Session key derivation

use intake_document::ActivityName;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifier of one staging session
///
/// Derived deterministically from `(activity name, user id)` - never from the
/// activity alone, so concurrent uploads by different users to the same
/// activity land in disjoint sessions. The hex form is filesystem-safe and is
/// used verbatim as the session directory name by the filesystem backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey(String);

impl SessionKey {
    /// Derive the key for one `(activity, user)` pair
    #[must_use]
    pub fn derive(activity: &ActivityName, user_id: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(activity.as_str().as_bytes());
        hasher.update([0]);
        hasher.update(user_id.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// The key as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
