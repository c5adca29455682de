use image::DynamicImage;
use taplist_core::Cell;

use crate::preprocess::{crop_cell, CropFormat};
use crate::recognizer::OcrBackend;

/// Reads the text of individual cells from one decoded image.
///
/// Every failure is local to its cell: a degenerate cell, a crop that cannot
/// be encoded or an engine error all come back as empty text.
pub struct FieldExtractor<'a, R: OcrBackend + ?Sized> {
    recognizer: &'a R,
    image: &'a DynamicImage,
    format: CropFormat,
}

impl<'a, R: OcrBackend + ?Sized> FieldExtractor<'a, R> {
    pub fn new(recognizer: &'a R, image: &'a DynamicImage, format: CropFormat) -> Self {
        Self { recognizer, image, format }
    }

    pub fn extract(&self, cell: &Cell) -> String {
        if cell.is_degenerate() {
            return String::new();
        }
        let bytes = match crop_cell(self.image, cell, self.format) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(x = cell.x, y = cell.y, "cell crop failed: {e}");
                return String::new();
            }
        };
        match self.recognizer.recognize(&bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(x = cell.x, y = cell.y, "cell recognition failed: {e}");
                String::new()
            }
        }
    }
}
