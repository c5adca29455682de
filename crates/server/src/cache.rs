use std::sync::Arc;

use axum::body::Bytes;
use tokio::sync::RwLock;

/// A rendered tap list and the fingerprint of the image it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDocument {
    pub fingerprint: String,
    /// Pretty-printed JSON array of taps.
    pub payload: Bytes,
    pub tap_count: usize,
}

/// Holds the last successfully built document. Readers always see either
/// the previous document or the new one in full.
#[derive(Debug, Default)]
pub struct DocumentCache {
    current: RwLock<Option<Arc<CachedDocument>>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&self) -> Option<Arc<CachedDocument>> {
        self.current.read().await.clone()
    }

    /// Replace the cached document, returning the stored handle.
    pub async fn store(&self, document: CachedDocument) -> Arc<CachedDocument> {
        let document = Arc::new(document);
        *self.current.write().await = Some(Arc::clone(&document));
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(fingerprint: &str) -> CachedDocument {
        CachedDocument {
            fingerprint: fingerprint.into(),
            payload: Bytes::from_static(b"[]"),
            tap_count: 0,
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        assert!(DocumentCache::new().load().await.is_none());
    }

    #[tokio::test]
    async fn store_replaces_previous_document() {
        let cache = DocumentCache::new();
        cache.store(doc("\"a\"")).await;
        let stored = cache.store(doc("\"b\"")).await;

        let loaded = cache.load().await.unwrap();
        assert_eq!(loaded.fingerprint, "\"b\"");
        assert!(Arc::ptr_eq(&loaded, &stored));
    }

    #[tokio::test]
    async fn earlier_handles_stay_valid_after_swap() {
        let cache = DocumentCache::new();
        let old = cache.store(doc("\"a\"")).await;
        cache.store(doc("\"b\"")).await;
        assert_eq!(old.fingerprint, "\"a\"");
    }
}
