pub mod detect;
pub mod extract;
pub mod hash;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use detect::{detect_grid, DarknessPolicy, DetectorConfig};
pub use extract::FieldExtractor;
pub use hash::{content_fingerprint, sha256_bytes};
pub use pipeline::{PipelineConfig, PipelineError, TapListPipeline};
pub use preprocess::{crop_cell, decode_image, CropFormat, PreprocessError};
pub use recognizer::{default_backend, EngineSettings, MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
