use image::DynamicImage;
use taplist_core::{assemble_tap, data_rows, segment, AssemblyOptions, Tap};
use thiserror::Error;

use crate::detect::{detect_grid, DetectorConfig};
use crate::extract::FieldExtractor;
use crate::preprocess::{self, CropFormat, PreprocessError};
use crate::recognizer::OcrBackend;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image could not be decoded: {0}")]
    Decode(#[from] PreprocessError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub detector: DetectorConfig,
    pub crop_format: CropFormat,
    pub assembly: AssemblyOptions,
}

/// Orchestrates: decode → detect grid → segment → per-row extract → assemble.
pub struct TapListPipeline<R: OcrBackend> {
    recognizer: R,
    config: PipelineConfig,
}

impl<R: OcrBackend> TapListPipeline<R> {
    pub fn new(recognizer: R, config: PipelineConfig) -> Self {
        Self { recognizer, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process raw image bytes as fetched from the remote source.
    pub fn process_bytes(&self, data: &[u8]) -> Result<Vec<Tap>, PipelineError> {
        let image = preprocess::decode_image(data)?;
        Ok(self.process_image(&image))
    }

    /// Process an already decoded image. A missing grid yields no taps.
    pub fn process_image(&self, image: &DynamicImage) -> Vec<Tap> {
        let lines = detect_grid(image, &self.config.detector);
        if lines.is_empty() {
            tracing::warn!("no grid found in image");
            return Vec::new();
        }

        let grid = segment(&lines);
        tracing::info!(
            rows = grid.row_count(),
            columns = grid.column_count(),
            "grid segmented"
        );

        let extractor = FieldExtractor::new(&self.recognizer, image, self.config.crop_format);
        data_rows(&grid)
            .iter()
            .zip(1u32..)
            .map(|(row, tap_number)| {
                // The first column holds the printed tap number; numbering
                // follows row order instead.
                let texts = row.iter().skip(1).map(|cell| extractor.extract(cell));
                assemble_tap(tap_number, texts, &self.config.assembly)
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
