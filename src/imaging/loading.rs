//! # Image Loading
//!
//! Decodes images from disk or memory and reads their EXIF orientation tag.

use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader};
use tracing;

use super::types::{ImagingError, Orientation, RawImage};

/// Loads and decodes an image file, keeping its orientation tag.
///
/// The pixels are returned as stored; use [`super::flatten`] to render them upright.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RawImage, ImagingError> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| ImagingError::ImageLoad {
            message: format!("{}: {}", path.display(), e),
        })?;

    let raw = decode(reader)?;

    tracing::debug!(
        target: "imaging",
        path = %path.display(),
        width = raw.image.width(),
        height = raw.image.height(),
        orientation = ?raw.orientation,
        "Loaded image from disk"
    );

    Ok(raw)
}

/// Decodes an encoded image held in memory.
pub fn load_image_from_memory(bytes: &[u8]) -> Result<RawImage, ImagingError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImagingError::ImageLoad {
            message: e.to_string(),
        })?;

    decode(reader)
}

fn decode<R: BufRead + Seek>(reader: ImageReader<R>) -> Result<RawImage, ImagingError> {
    let mut decoder = reader.into_decoder().map_err(|e| ImagingError::ImageLoad {
        message: e.to_string(),
    })?;

    // Formats without orientation metadata report no transforms; a malformed tag is ignored
    let orientation = match decoder.orientation() {
        Ok(orientation) => Orientation::from(orientation),
        Err(e) => {
            tracing::warn!(target: "imaging", error = %e, "Ignoring unreadable orientation tag");
            Orientation::Up
        }
    };

    let image = DynamicImage::from_decoder(decoder).map_err(|e| ImagingError::ImageLoad {
        message: e.to_string(),
    })?;

    Ok(RawImage::with_orientation(image, orientation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([1, 2, 3])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_load_from_memory_png() {
        let raw = load_image_from_memory(&png_bytes(7, 3)).unwrap();
        assert_eq!(raw.dimensions(), (7, 3));
        assert_eq!(raw.orientation, Orientation::Up);
    }

    #[test]
    fn test_load_from_memory_garbage() {
        let result = load_image_from_memory(b"definitely not an image");
        assert!(matches!(result, Err(ImagingError::ImageLoad { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_image("/nonexistent/dir/photo.jpg");
        assert!(matches!(result, Err(ImagingError::ImageLoad { .. })));
    }
}
