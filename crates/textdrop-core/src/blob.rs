//! In-memory blob registry backing downloads.
//!
//! A [`BlobStore`] hands out revocable [`DownloadHandle`]s. Each handle is
//! reference counted; when the last clone is dropped its blob is released.
//! Dropping the store releases everything it still holds.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use compact_str::CompactString;
use dashmap::DashMap;
use serde::{Serialize, Serializer};

/// URL identifying a live blob, e.g. `blob:textdrop/7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlobUrl(CompactString);

impl BlobUrl {
    /// Scheme and authority shared by every URL this crate generates.
    pub const PREFIX: &'static str = "blob:textdrop/";

    fn from_seq(seq: u64) -> Self {
        Self(compact_str::format_compact!("{}{seq}", Self::PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable blob contents plus the MIME type it is tagged with.
#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: Arc<[u8]>,
    pub mime: CompactString,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    blobs: DashMap<BlobUrl, Blob>,
    next_seq: AtomicU64,
}

/// Registry of live blobs. Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    inner: Arc<StoreInner>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blob and return the handle that keeps it alive.
    pub fn create(&self, bytes: impl Into<Arc<[u8]>>, mime: &str) -> DownloadHandle {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let url = BlobUrl::from_seq(seq);
        let blob = Blob {
            bytes: bytes.into(),
            mime: CompactString::from(mime),
        };
        tracing::trace!(%url, len = blob.len(), "blob created");
        self.inner.blobs.insert(url.clone(), blob);

        DownloadHandle {
            inner: Arc::new(HandleInner {
                url,
                store: Arc::downgrade(&self.inner),
            }),
        }
    }

    /// Look up a live blob.
    pub fn fetch(&self, url: &BlobUrl) -> Option<Blob> {
        self.inner.blobs.get(url).map(|entry| entry.value().clone())
    }

    /// Release a blob before its handle is dropped.
    ///
    /// Returns `false` if the URL was not live.
    pub fn revoke(&self, url: &BlobUrl) -> bool {
        let removed = self.inner.blobs.remove(url).is_some();
        if removed {
            tracing::trace!(%url, "blob revoked");
        }
        removed
    }

    /// Number of blobs currently held.
    pub fn live_count(&self) -> usize {
        self.inner.blobs.len()
    }

    /// Total bytes currently held.
    pub fn live_bytes(&self) -> usize {
        self.inner.blobs.iter().map(|entry| entry.value().len()).sum()
    }
}

struct HandleInner {
    url: BlobUrl,
    store: Weak<StoreInner>,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            if store.blobs.remove(&self.url).is_some() {
                tracing::trace!(url = %self.url, "blob released");
            }
        }
    }
}

/// Shared ownership of one blob's URL.
#[derive(Clone)]
pub struct DownloadHandle {
    inner: Arc<HandleInner>,
}

impl DownloadHandle {
    pub fn url(&self) -> &BlobUrl {
        &self.inner.url
    }
}

impl PartialEq for DownloadHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.url == other.inner.url
    }
}

impl Eq for DownloadHandle {}

impl fmt::Debug for DownloadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DownloadHandle").field(&self.inner.url).finish()
    }
}

impl Serialize for DownloadHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.inner.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_fetch() {
        let store = BlobStore::new();
        let handle = store.create(b"hello".as_slice(), "text/plain");

        assert!(handle.url().as_str().starts_with(BlobUrl::PREFIX));
        let blob = store.fetch(handle.url()).unwrap();
        assert_eq!(&*blob.bytes, b"hello");
        assert_eq!(blob.mime, "text/plain");
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.live_bytes(), 5);
    }

    #[test]
    fn test_urls_are_unique() {
        let store = BlobStore::new();
        let a = store.create(b"a".as_slice(), "text/plain");
        let b = store.create(b"a".as_slice(), "text/plain");
        assert_ne!(a, b);
    }

    #[test]
    fn test_drop_releases_blob() {
        let store = BlobStore::new();
        let handle = store.create(b"bye".as_slice(), "text/plain");
        let url = handle.url().clone();
        let clone = handle.clone();

        drop(handle);
        assert!(store.fetch(&url).is_some(), "clone still holds the blob");

        drop(clone);
        assert!(store.fetch(&url).is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_explicit_revoke() {
        let store = BlobStore::new();
        let handle = store.create(b"x".as_slice(), "text/plain");
        assert!(store.revoke(handle.url()));
        assert!(!store.revoke(handle.url()));
        assert!(store.fetch(handle.url()).is_none());
    }

    #[test]
    fn test_handle_outlives_store() {
        let store = BlobStore::new();
        let handle = store.create(b"x".as_slice(), "text/plain");
        drop(store);
        // Dropping the handle after the registry is gone must not panic.
        drop(handle);
    }
}
