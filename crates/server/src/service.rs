use std::sync::Arc;

use taplist_ocr::{OcrBackend, PipelineError, TapListPipeline};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::cache::{CachedDocument, DocumentCache};
use crate::fetch::{FetchError, FetchOutcome, ImageSource};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Fetching the draft list failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Processing the draft list failed: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Serializing the tap list failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Pipeline worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("Source reported no change but no tap list has been built yet")]
    NothingCached,
}

/// Keeps the served tap list in step with the remote image.
///
/// Refreshes are serialized: a request arriving while another one rebuilds
/// the list waits for it and then sees the finished document.
pub struct TapListService<S, R: OcrBackend> {
    source: S,
    pipeline: Arc<TapListPipeline<R>>,
    cache: Arc<DocumentCache>,
    refresh_gate: Mutex<()>,
}

impl<S, R> TapListService<S, R>
where
    S: ImageSource,
    R: OcrBackend + 'static,
{
    pub fn new(source: S, pipeline: TapListPipeline<R>, cache: Arc<DocumentCache>) -> Self {
        Self {
            source,
            pipeline: Arc::new(pipeline),
            cache,
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &Arc<DocumentCache> {
        &self.cache
    }

    /// The document for the current remote image. Fetch and decode failures
    /// fall back to the last good document when one exists.
    pub async fn current(&self) -> Result<Arc<CachedDocument>, RefreshError> {
        let _gate = self.refresh_gate.lock().await;
        let cached = self.cache.load().await;

        match self.refresh(cached.clone()).await {
            Ok(document) => Ok(document),
            Err(e) => match cached {
                Some(stale) => {
                    tracing::warn!(fingerprint = %stale.fingerprint, "refresh failed, serving previous tap list: {e}");
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }

    async fn refresh(
        &self,
        cached: Option<Arc<CachedDocument>>,
    ) -> Result<Arc<CachedDocument>, RefreshError> {
        let known = cached.as_ref().map(|doc| doc.fingerprint.as_str());
        let outcome = self.source.fetch(known).await?;
        let (bytes, fingerprint) = match outcome {
            FetchOutcome::NotModified => {
                tracing::debug!("image not modified");
                return cached.ok_or(RefreshError::NothingCached);
            }
            FetchOutcome::Fetched { bytes, fingerprint } => (bytes, fingerprint),
        };

        if let Some(doc) = cached.filter(|doc| doc.fingerprint == fingerprint) {
            tracing::debug!(%fingerprint, "fingerprint unchanged");
            return Ok(doc);
        }

        tracing::info!(%fingerprint, "draft list changed, rebuilding");
        let pipeline = Arc::clone(&self.pipeline);
        let taps = tokio::task::spawn_blocking(move || pipeline.process_bytes(&bytes)).await??;
        let payload = serde_json::to_vec_pretty(&taps)?;

        let document = self
            .cache
            .store(CachedDocument {
                fingerprint,
                payload: payload.into(),
                tap_count: taps.len(),
            })
            .await;
        tracing::info!(taps = document.tap_count, "tap list stored");
        Ok(document)
    }
}
