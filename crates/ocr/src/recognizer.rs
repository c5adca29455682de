use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available — build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
/// Implementations accept encoded PNG/JPEG bytes of a single cell and return
/// the recognized text, untrimmed.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

impl<B: OcrBackend + ?Sized> OcrBackend for Box<B> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(image_bytes)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string for every cell.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

/// Stand-in used when the binary was built without an OCR engine: every
/// cell fails, so documents come out with empty fields instead of the
/// process refusing to start.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

/// Settings for constructing the engine-backed recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub data_path: Option<String>,
    pub lang: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { data_path: None, lang: "eng".to_string() }
    }
}

/// The best backend this build can offer.
#[cfg(feature = "tesseract")]
pub fn default_backend(settings: &EngineSettings) -> Box<dyn OcrBackend> {
    Box::new(tesseract_backend::TesseractRecognizer::new(
        settings.data_path.clone(),
        &settings.lang,
    ))
}

/// The best backend this build can offer.
#[cfg(not(feature = "tesseract"))]
pub fn default_backend(_settings: &EngineSettings) -> Box<dyn OcrBackend> {
    tracing::warn!("built without the `tesseract` feature; every cell will be empty");
    Box::new(UnavailableRecognizer)
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    /// A fresh engine is initialised per call and dropped when the call
    /// returns, so no engine state leaks between cells.
    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
