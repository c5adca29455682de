//! Fakes shared by the service and route tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};
use reqwest::StatusCode;
use taplist_ocr::{OcrBackend, OcrError};

use crate::fetch::{FetchError, FetchOutcome, ImageSource};

enum Reply {
    Image { bytes: Vec<u8>, fingerprint: String },
    Fail,
}

/// Image source driven by the test. Counts full downloads separately from
/// fingerprint checks.
pub struct ScriptedSource {
    reply: Mutex<Reply>,
    honours_conditional: bool,
    downloads: AtomicUsize,
}

impl ScriptedSource {
    pub fn serving(bytes: Vec<u8>, fingerprint: &str) -> Self {
        Self {
            reply: Mutex::new(Reply::Image { bytes, fingerprint: fingerprint.into() }),
            honours_conditional: true,
            downloads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Mutex::new(Reply::Fail),
            honours_conditional: true,
            downloads: AtomicUsize::new(0),
        }
    }

    /// Behave like an origin that never answers `304 Not Modified`.
    pub fn ignoring_conditional(mut self) -> Self {
        self.honours_conditional = false;
        self
    }

    pub fn set_image(&self, bytes: Vec<u8>, fingerprint: &str) {
        *self.reply.lock().unwrap() = Reply::Image { bytes, fingerprint: fingerprint.into() };
    }

    pub fn set_failing(&self) {
        *self.reply.lock().unwrap() = Reply::Fail;
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for ScriptedSource {
    async fn fetch(&self, known_fingerprint: Option<&str>) -> Result<FetchOutcome, FetchError> {
        let reply = self.reply.lock().unwrap();
        match &*reply {
            Reply::Fail => Err(FetchError::Status {
                url: "test://draft-list.png".into(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            }),
            Reply::Image { fingerprint, .. }
                if self.honours_conditional && known_fingerprint == Some(fingerprint.as_str()) =>
            {
                Ok(FetchOutcome::NotModified)
            }
            Reply::Image { bytes, fingerprint } => {
                self.downloads.fetch_add(1, Ordering::SeqCst);
                Ok(FetchOutcome::Fetched { bytes: bytes.clone(), fingerprint: fingerprint.clone() })
            }
        }
    }
}

/// Returns the same text for every cell and counts calls.
pub struct CountingRecognizer {
    pub calls: Arc<AtomicUsize>,
    text: String,
}

impl CountingRecognizer {
    pub fn new(text: &str) -> Self {
        Self { calls: Arc::new(AtomicUsize::new(0)), text: text.into() }
    }
}

impl OcrBackend for CountingRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// PNG poster with a header row, `data_rows` tap rows and a footer row,
/// each split into a tap-number column and a brewery column.
pub fn poster_png(data_rows: u32) -> Vec<u8> {
    let bottom = 15 * (data_rows + 2);
    let img: RgbaImage = ImageBuffer::from_fn(40, bottom + 1, |x, y| {
        if [0, 20, 39].contains(&x) || y % 15 == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
