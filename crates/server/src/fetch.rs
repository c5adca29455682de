use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use taplist_ocr::content_fingerprint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("No draft list image found on {0}")]
    ImageNotFound(String),
}

/// Result of asking the remote source for the current image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The image still matches the fingerprint we already have.
    NotModified,
    Fetched { bytes: Vec<u8>, fingerprint: String },
}

/// Where the draft list image comes from.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the image unless it still matches `known_fingerprint`.
    async fn fetch(&self, known_fingerprint: Option<&str>) -> Result<FetchOutcome, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// URL of the image itself.
    Direct(String),
    /// URL of an HTML page embedding the image through `srcset`.
    Page(String),
}

pub struct HttpImageSource {
    client: reqwest::Client,
    location: ImageLocation,
}

impl HttpImageSource {
    pub fn new(location: ImageLocation, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("taplist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, location })
    }

    async fn image_url(&self) -> Result<String, FetchError> {
        match &self.location {
            ImageLocation::Direct(url) => Ok(url.clone()),
            ImageLocation::Page(page) => {
                let response = self.client.get(page).send().await?;
                if !response.status().is_success() {
                    return Err(FetchError::Status { url: page.clone(), status: response.status() });
                }
                let html = response.text().await?;
                let url = find_image_url(&html).ok_or_else(|| FetchError::ImageNotFound(page.clone()))?;
                tracing::debug!(%url, "found image URL");
                Ok(url)
            }
        }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, known_fingerprint: Option<&str>) -> Result<FetchOutcome, FetchError> {
        let url = self.image_url().await?;
        let mut request = self.client.get(&url);
        if let Some(fingerprint) = known_fingerprint {
            request = request.header(IF_NONE_MATCH, fingerprint);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::NotModified);
        }
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        let fingerprint = etag.unwrap_or_else(|| content_fingerprint(&bytes));
        tracing::info!(%url, bytes = bytes.len(), %fingerprint, "image fetched");
        Ok(FetchOutcome::Fetched { bytes, fingerprint })
    }
}

fn srcset_candidate() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"w,\s([^\s]+)\s").expect("invalid regex"))
}

/// The last `srcset` candidate on the page, which is the largest rendition.
pub fn find_image_url(html: &str) -> Option<String> {
    srcset_candidate()
        .captures_iter(html)
        .last()
        .map(|caps| caps[1].to_string())
}
