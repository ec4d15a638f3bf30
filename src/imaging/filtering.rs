//! # Color Filtering Module
//!
//! Saturation, brightness and contrast adjustment. The grayscale filter applied
//! to picked photos is the saturation-zero preset.

use image::{DynamicImage, GenericImageView, Rgba};
use imageproc::map::map_colors;

use crate::observability;

/// Rec. 709 luma weights.
const LUMA_WEIGHTS: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// Color controls applied per pixel in normalized [0, 1] space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorControls {
    /// 0.0 removes all chroma, 1.0 leaves colors untouched, > 1.0 boosts them
    pub saturation: f32,
    /// Added to every channel after the saturation step
    pub brightness: f32,
    /// Scales channel distance from mid-gray
    pub contrast: f32,
}

impl Default for ColorControls {
    fn default() -> Self {
        Self {
            saturation: 1.0,
            brightness: 0.0,
            contrast: 1.0,
        }
    }
}

impl ColorControls {
    /// Black and white preset.
    pub fn grayscale() -> Self {
        Self {
            saturation: 0.0,
            ..Self::default()
        }
    }

    /// Applies the controls, returning `None` when the image has no pixels to process.
    ///
    /// The output is always 8-bit RGBA; alpha is carried through unchanged.
    pub fn apply(&self, image: &DynamicImage) -> Option<DynamicImage> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            tracing::warn!(
                target: "imaging",
                width,
                height,
                "Color filter skipped: image has no pixel buffer"
            );
            return None;
        }

        let rgba = image.to_rgba8();
        let controls = *self;
        let filtered = map_colors(&rgba, move |pixel: Rgba<u8>| controls.map_pixel(pixel));

        Some(DynamicImage::ImageRgba8(filtered))
    }

    fn map_pixel(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        let channels = [r, g, b].map(|c| c as f32 / 255.0);
        let luma = channels
            .iter()
            .zip(LUMA_WEIGHTS.iter())
            .map(|(c, w)| c * w)
            .sum::<f32>();

        let adjusted = channels.map(|c| {
            let saturated = luma + self.saturation * (c - luma);
            let brightened = saturated + self.brightness;
            let contrasted = (brightened - 0.5) * self.contrast + 0.5;
            (contrasted.clamp(0.0, 1.0) * 255.0).round() as u8
        });

        Rgba([adjusted[0], adjusted[1], adjusted[2], a])
    }
}

/// Removes all chroma from `image`.
///
/// Returns `None` if the image cannot provide a pixel buffer; callers fall back to
/// a placeholder instead of propagating the failure.
///
/// # Examples
///
/// ```
/// use experience_capture::imaging::to_grayscale;
/// use image::{DynamicImage, Rgb, RgbImage};
///
/// let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([200, 40, 90])));
/// let gray = to_grayscale(&img).unwrap().to_rgba8();
/// let [r, g, b, _] = gray.get_pixel(0, 0).0;
/// assert!(r == g && g == b);
/// ```
pub fn to_grayscale(image: &DynamicImage) -> Option<DynamicImage> {
    let result = ColorControls::grayscale().apply(image);
    observability::record_filter_metrics(result.is_some());
    result
}
