use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use taplist_core::Cell;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode cell image: {0}")]
    Encode(String),
}

/// Encoding used when handing a cropped cell to the recognizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropFormat {
    #[default]
    Png,
    Jpeg,
}

impl CropFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            CropFormat::Png => ImageFormat::Png,
            CropFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl std::str::FromStr for CropFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(CropFormat::Png),
            "jpg" | "jpeg" => Ok(CropFormat::Jpeg),
            other => Err(format!("Unknown crop format: '{other}'")),
        }
    }
}

/// Decode raw JPEG / PNG bytes, sniffing the format from the content.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, PreprocessError> {
    Ok(image::load_from_memory(data)?)
}

/// Copy the cell's rectangle out of `image` and encode it. The source image
/// is not modified; a rectangle reaching past the image edge is clipped.
pub fn crop_cell(
    image: &DynamicImage,
    cell: &Cell,
    format: CropFormat,
) -> Result<Vec<u8>, PreprocessError> {
    let cropped = image.crop_imm(cell.x, cell.y, cell.width, cell.height);
    if cropped.width() == 0 || cropped.height() == 0 {
        return Err(PreprocessError::Encode(format!(
            "cell at ({}, {}) lies outside the {}x{} image",
            cell.x,
            cell.y,
            image.width(),
            image.height()
        )));
    }
    // JPEG has no alpha channel.
    let cropped = match format {
        CropFormat::Jpeg => DynamicImage::ImageRgb8(cropped.to_rgb8()),
        CropFormat::Png => cropped,
    };
    encode(&cropped, format)
}

fn encode(img: &DynamicImage, format: CropFormat) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format.image_format())
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
