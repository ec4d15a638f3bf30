//! # Image Scaling Module
//!
//! Fits an image into a bounding box and renders the resized raster.

use image::{DynamicImage, GenericImageView};
use tracing;

use super::types::{BoundingBox, FitMode, ImagingError, ResampleFilter, ScaledImageResult};

/// Configuration for fitting images into a display bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageScaler {
    fit_mode: FitMode,
    filter: ResampleFilter,
}

impl ImageScaler {
    /// Creates a scaler with the corner-fit mode and bilinear resampling.
    ///
    /// # Examples
    ///
    /// ```
    /// use experience_capture::imaging::{FitMode, ImageScaler, ResampleFilter};
    ///
    /// let scaler = ImageScaler::new();
    /// assert_eq!(scaler.fit_mode(), FitMode::CornerFit);
    /// assert_eq!(scaler.filter(), ResampleFilter::Bilinear);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(fit_mode: FitMode, filter: ResampleFilter) -> Self {
        Self { fit_mode, filter }
    }

    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    /// Fits `image` into `bbox` and resamples it to the computed size.
    ///
    /// # Errors
    ///
    /// Returns `ImagingError::InvalidTarget` if either box dimension is not positive
    /// or exceeds [`MAX_TARGET_DIMENSION`], and `ImagingError::DecodeFailure` if the image has no pixels.
    ///
    /// # Examples
    ///
    /// ```
    /// use experience_capture::imaging::{BoundingBox, ImageScaler};
    /// use image::{DynamicImage, RgbImage};
    ///
    /// let img = DynamicImage::ImageRgb8(RgbImage::new(300, 200));
    /// let scaled = ImageScaler::new().fit(&img, BoundingBox::new(30.0, 40.0)).unwrap();
    /// assert_eq!(scaled.new_dimensions, (30, 27));
    /// ```
    pub fn fit(
        &self,
        image: &DynamicImage,
        bbox: BoundingBox,
    ) -> Result<ScaledImageResult, ImagingError> {
        let start_time = std::time::Instant::now();
        let (width, height) = image.dimensions();

        let (target_width, target_height) = fit_size((width, height), bbox, self.fit_mode)?;
        let new_width = to_pixels(target_width, bbox.width);
        let new_height = to_pixels(target_height, bbox.height);

        let scaled = image.resize_exact(new_width, new_height, self.filter.filter_type());

        let processing_time = start_time.elapsed();

        tracing::debug!(
            target: "imaging",
            "Scaled {}x{} -> {}x{} ({:?}, {:?}) in {}ms",
            width,
            height,
            new_width,
            new_height,
            self.fit_mode,
            self.filter,
            processing_time.as_millis()
        );

        Ok(ScaledImageResult {
            image: scaled,
            original_dimensions: (width, height),
            target_size: (target_width, target_height),
            new_dimensions: (new_width, new_height),
            fit_mode: self.fit_mode,
            processing_time_ms: processing_time.as_millis() as u32,
        })
    }
}

/// Largest box side, in pixels, that an image may be fitted into.
pub const MAX_TARGET_DIMENSION: f64 = 16_384.0;

/// Computes the fractional target size for an image of `dimensions` fitted into `bbox`.
///
/// # Examples
///
/// ```
/// use experience_capture::imaging::{fit_size, BoundingBox, FitMode};
///
/// let (w, h) = fit_size((3000, 2000), BoundingBox::new(300.0, 400.0), FitMode::CornerFit).unwrap();
/// assert_eq!(w, 300.0);
/// assert!((h - 266.666).abs() < 0.01);
/// ```
pub fn fit_size(
    dimensions: (u32, u32),
    bbox: BoundingBox,
    mode: FitMode,
) -> Result<(f64, f64), ImagingError> {
    if !bbox.is_valid()
        || bbox.width > MAX_TARGET_DIMENSION
        || bbox.height > MAX_TARGET_DIMENSION
    {
        return Err(ImagingError::InvalidTarget {
            width: bbox.width,
            height: bbox.height,
        });
    }

    let (width, height) = dimensions;
    if width == 0 || height == 0 {
        return Err(ImagingError::DecodeFailure {
            message: format!("image has empty dimensions {}x{}", width, height),
        });
    }

    let (width, height) = (width as f64, height as f64);
    let aspect_ratio = width / height;

    let size = match mode {
        FitMode::CornerFit => {
            if bbox.width > bbox.width * aspect_ratio {
                (bbox.width * aspect_ratio, bbox.height)
            } else {
                (bbox.width, bbox.height / aspect_ratio)
            }
        }
        FitMode::Contain => {
            let factor = (bbox.width / width).min(bbox.height / height);
            // Pin the constraining side to the box so rounding cannot push past it
            if bbox.width / width <= bbox.height / height {
                (bbox.width, (height * factor).min(bbox.height))
            } else {
                ((width * factor).min(bbox.width), bbox.height)
            }
        }
    };

    Ok(size)
}

/// Rounds a fractional size to whole pixels without exceeding `limit`, never below one.
fn to_pixels(value: f64, limit: f64) -> u32 {
    value.round().min(limit.floor()).max(1.0) as u32
}
