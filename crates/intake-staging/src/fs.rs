//! Filesystem staging backend
//!
//! One directory per open session, named by the session key. Each item is a
//! `NNNNN.doc` content file plus a `NNNNN.json` sidecar; the sidecar is
//! written last, so `list` (which is keyed on sidecars) never observes a
//! half-written item. `destroy` removes the directory wholesale.

use crate::key::SessionKey;
use crate::store::{StagingError, StagingStore};
use chrono::{DateTime, Utc};
use intake_document::{DocumentKind, StagedItem};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const CONTENT_EXT: &str = "doc";
const SIDECAR_EXT: &str = "json";

/// Sidecar metadata stored next to each content file
#[derive(Debug, Serialize, Deserialize)]
struct ItemSidecar {
    kind: DocumentKind,
    context: String,
    attached_at: DateTime<Utc>,
    content_file: String,
}

/// Durable staging store rooted at one directory
///
/// Survives process restart at the cost of I/O on every operation. The
/// session TTL sweep still applies; an abandoned directory is reclaimed the
/// same way an explicit discard is, through `destroy`.
#[derive(Debug, Clone)]
pub struct FsStagingStore {
    root: PathBuf,
}

impl FsStagingStore {
    /// Create a store rooted at `root` (created lazily on first open)
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_dir(&self, key: &SessionKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Highest sequence number currently on disk, if any
    async fn last_sequence(dir: &Path) -> Result<Option<u32>, StagingError> {
        let mut entries = fs::read_dir(dir).await?;
        let mut last = None;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(seq) = sidecar_sequence(&entry.path()) {
                last = last.max(Some(seq));
            }
        }
        Ok(last)
    }
}

fn sidecar_sequence(path: &Path) -> Option<u32> {
    if path.extension()? != SIDECAR_EXT {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

fn not_found(err: &std::io::Error) -> bool {
    err.kind() == ErrorKind::NotFound
}

/// Write one staged file, surfacing a vanished session directory as
/// `SessionNotFound` - a destroy racing an in-flight append wins
async fn write_item_file(path: PathBuf, bytes: Vec<u8>) -> Result<(), StagingError> {
    match fs::write(path, bytes).await {
        Ok(()) => Ok(()),
        Err(err) if not_found(&err) => Err(StagingError::SessionNotFound),
        Err(err) => Err(err.into()),
    }
}

/// Read one staged file, surfacing a vanished session directory as
/// `SessionNotFound` - a destroy racing an in-flight list wins
async fn read_item_file(path: PathBuf) -> Result<Vec<u8>, StagingError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(err) if not_found(&err) => Err(StagingError::SessionNotFound),
        Err(err) => Err(err.into()),
    }
}

#[async_trait::async_trait]
impl StagingStore for FsStagingStore {
    async fn open_session(&self, key: &SessionKey) -> Result<(), StagingError> {
        // create_dir_all is a no-op for a live session, so re-opening never
        // clobbers staged items
        fs::create_dir_all(self.session_dir(key)).await?;
        tracing::debug!("opened staging directory for session {key}");
        Ok(())
    }

    async fn append(&self, key: &SessionKey, item: StagedItem) -> Result<(), StagingError> {
        let dir = self.session_dir(key);
        let seq = match Self::last_sequence(&dir).await {
            Ok(last) => last.map_or(0, |n| n + 1),
            Err(StagingError::Io(err)) if not_found(&err) => {
                return Err(StagingError::SessionNotFound)
            }
            Err(err) => return Err(err),
        };

        let content_file = format!("{seq:05}.{CONTENT_EXT}");
        // Content first, sidecar last: a crash between the two writes leaves
        // an orphan content file that list() never surfaces
        write_item_file(dir.join(&content_file), item.content).await?;

        let sidecar = ItemSidecar {
            kind: item.kind,
            context: item.context,
            attached_at: item.attached_at,
            content_file,
        };
        let sidecar_path = dir.join(format!("{seq:05}.{SIDECAR_EXT}"));
        write_item_file(sidecar_path, serde_json::to_vec(&sidecar)?).await?;
        tracing::debug!("staged item {seq} for session {key}");
        Ok(())
    }

    async fn list(&self, key: &SessionKey) -> Result<Vec<StagedItem>, StagingError> {
        let dir = self.session_dir(key);
        let mut sequences = Vec::new();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if not_found(&err) => return Err(StagingError::SessionNotFound),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if let Some(seq) = sidecar_sequence(&entry.path()) {
                sequences.push(seq);
            }
        }
        sequences.sort_unstable();

        let mut items = Vec::with_capacity(sequences.len());
        for seq in sequences {
            let raw = read_item_file(dir.join(format!("{seq:05}.{SIDECAR_EXT}"))).await?;
            let sidecar: ItemSidecar = serde_json::from_slice(&raw)?;
            let content = read_item_file(dir.join(&sidecar.content_file)).await?;
            items.push(
                StagedItem::new(sidecar.kind, content, sidecar.context)
                    .with_attached_at(sidecar.attached_at),
            );
        }
        Ok(items)
    }

    async fn destroy(&self, key: &SessionKey) -> Result<(), StagingError> {
        match fs::remove_dir_all(self.session_dir(key)).await {
            Ok(()) => {
                tracing::debug!("destroyed staging directory for session {key}");
                Ok(())
            }
            // Already gone - destroy is idempotent
            Err(err) if not_found(&err) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_document::ActivityName;

    fn key(user: &str) -> SessionKey {
        SessionKey::derive(&ActivityName::new("Bar Roma").unwrap(), user)
    }

    fn item(kind: DocumentKind, body: &[u8], context: &str) -> StagedItem {
        StagedItem::new(kind, body.to_vec(), context)
    }

    #[tokio::test]
    async fn append_and_list_preserve_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStagingStore::new(tmp.path());
        let k = key("1");

        store.open_session(&k).await.unwrap();
        store
            .append(&k, item(DocumentKind::Cpi, b"one", "first"))
            .await
            .unwrap();
        store
            .append(&k, item(DocumentKind::Other, b"two", "second"))
            .await
            .unwrap();

        let items = store.list(&k).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, DocumentKind::Cpi);
        assert_eq!(items[0].content, b"one");
        assert_eq!(items[1].context, "second");
    }

    #[tokio::test]
    async fn append_without_open_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStagingStore::new(tmp.path());

        let err = store
            .append(&key("1"), item(DocumentKind::Other, b"x", "ctx"))
            .await
            .unwrap_err();
        assert!(matches!(err, StagingError::SessionNotFound));
    }

    #[tokio::test]
    async fn destroy_removes_directory_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStagingStore::new(tmp.path());
        let k = key("1");

        store.open_session(&k).await.unwrap();
        store
            .append(&k, item(DocumentKind::Haccp, b"body", "ctx"))
            .await
            .unwrap();

        store.destroy(&k).await.unwrap();
        assert!(!tmp.path().join(k.as_str()).exists());

        store.destroy(&k).await.unwrap();
        assert!(matches!(
            store.list(&k).await,
            Err(StagingError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn partial_write_is_invisible_to_list() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStagingStore::new(tmp.path());
        let k = key("1");

        store.open_session(&k).await.unwrap();
        store
            .append(&k, item(DocumentKind::Cpi, b"ok", "complete item"))
            .await
            .unwrap();

        // Simulate a crash after the content write but before the sidecar
        fs::write(tmp.path().join(k.as_str()).join("00001.doc"), b"torn")
            .await
            .unwrap();

        let items = store.list(&k).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].context, "complete item");
    }

    #[tokio::test]
    async fn sequence_resumes_after_restart() {
        let tmp = tempfile::tempdir().unwrap();
        let k = key("1");

        {
            let store = FsStagingStore::new(tmp.path());
            store.open_session(&k).await.unwrap();
            store
                .append(&k, item(DocumentKind::Cpi, b"before", "pre-restart"))
                .await
                .unwrap();
        }

        // A fresh store over the same root sees the session and keeps order
        let store = FsStagingStore::new(tmp.path());
        store.open_session(&k).await.unwrap();
        store
            .append(&k, item(DocumentKind::Other, b"after", "post-restart"))
            .await
            .unwrap();

        let items = store.list(&k).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].context, "pre-restart");
        assert_eq!(items[1].context, "post-restart");
    }

    #[tokio::test]
    async fn sessions_do_not_share_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStagingStore::new(tmp.path());
        let (ka, kb) = (key("a"), key("b"));

        store.open_session(&ka).await.unwrap();
        store.open_session(&kb).await.unwrap();
        store
            .append(&ka, item(DocumentKind::Cpi, b"a", "from a"))
            .await
            .unwrap();

        assert!(store.list(&kb).await.unwrap().is_empty());
        store.destroy(&ka).await.unwrap();
        assert!(store.list(&kb).await.unwrap().is_empty());
    }
}
