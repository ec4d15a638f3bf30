//! # Shared Types for Image Handling
//!
//! This module contains the shared types, structs, and enums used across
//! the imaging sub-modules.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

/// Errors that can occur during image loading, scaling and filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum ImagingError {
    /// Bounding box has a non-positive, non-finite or oversized dimension
    InvalidTarget { width: f64, height: f64 },
    /// No processable pixel buffer could be obtained from the source image
    DecodeFailure { message: String },
    /// Failed to read or decode an image file
    ImageLoad { message: String },
}

impl std::fmt::Display for ImagingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImagingError::InvalidTarget { width, height } => {
                write!(
                    f,
                    "Invalid target size: {}x{}. Both dimensions must be positive and within limits",
                    width, height
                )
            }
            ImagingError::DecodeFailure { message } => {
                write!(f, "No processable pixel data: {}", message)
            }
            ImagingError::ImageLoad { message } => {
                write!(f, "Failed to load image: {}", message)
            }
        }
    }
}

impl std::error::Error for ImagingError {}

/// Target dimensions an image must fit within, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Builds a box from a viewport size in points and the display's pixel density.
    ///
    /// # Examples
    ///
    /// ```
    /// use experience_capture::imaging::BoundingBox;
    ///
    /// let bbox = BoundingBox::from_viewport(375.0, 300.0, 2.0);
    /// assert_eq!(bbox, BoundingBox::new(750.0, 600.0));
    /// ```
    pub fn from_viewport(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width: width * scale,
            height: height * scale,
        }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// How the target size is derived from the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// Keeps one box dimension and shrinks the other by the aspect ratio.
    ///
    /// Portrait images keep the box height and get `box.width * aspect` as width;
    /// everything else keeps the box width and gets `box.height / aspect` as height.
    /// Only square boxes preserve the image's aspect ratio exactly.
    #[default]
    CornerFit,
    /// Largest size with the image's aspect ratio that fits inside the box.
    Contain,
}

impl std::str::FromStr for FitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corner-fit" | "corner" | "legacy" => Ok(FitMode::CornerFit),
            "contain" => Ok(FitMode::Contain),
            other => Err(format!("Unknown fit mode: {}", other)),
        }
    }
}

/// Resampling filter used when rendering a scaled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Bilinear,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl std::str::FromStr for ResampleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest" => Ok(ResampleFilter::Nearest),
            "bilinear" | "triangle" => Ok(ResampleFilter::Bilinear),
            "catmull-rom" | "cubic" => Ok(ResampleFilter::CatmullRom),
            "gaussian" => Ok(ResampleFilter::Gaussian),
            "lanczos3" | "lanczos" => Ok(ResampleFilter::Lanczos3),
            other => Err(format!("Unknown resample filter: {}", other)),
        }
    }
}

/// Orientation tag describing how stored pixels must be transformed to display upright.
///
/// Values follow the EXIF orientation field (1-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Up,
    UpMirrored,
    Down,
    DownMirrored,
    LeftMirrored,
    Right,
    RightMirrored,
    Left,
}

impl Orientation {
    /// Maps an EXIF orientation value; unknown values yield `None`.
    pub fn from_exif(value: u8) -> Option<Self> {
        match value {
            1 => Some(Orientation::Up),
            2 => Some(Orientation::UpMirrored),
            3 => Some(Orientation::Down),
            4 => Some(Orientation::DownMirrored),
            5 => Some(Orientation::LeftMirrored),
            6 => Some(Orientation::Right),
            7 => Some(Orientation::RightMirrored),
            8 => Some(Orientation::Left),
            _ => None,
        }
    }

    pub fn to_exif(self) -> u8 {
        match self {
            Orientation::Up => 1,
            Orientation::UpMirrored => 2,
            Orientation::Down => 3,
            Orientation::DownMirrored => 4,
            Orientation::LeftMirrored => 5,
            Orientation::Right => 6,
            Orientation::RightMirrored => 7,
            Orientation::Left => 8,
        }
    }

    /// Whether rendering upright swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::LeftMirrored
                | Orientation::Right
                | Orientation::RightMirrored
                | Orientation::Left
        )
    }
}

impl From<image::metadata::Orientation> for Orientation {
    fn from(value: image::metadata::Orientation) -> Self {
        use image::metadata::Orientation as Exif;
        match value {
            Exif::NoTransforms => Orientation::Up,
            Exif::FlipHorizontal => Orientation::UpMirrored,
            Exif::Rotate180 => Orientation::Down,
            Exif::FlipVertical => Orientation::DownMirrored,
            Exif::Rotate90FlipH => Orientation::LeftMirrored,
            Exif::Rotate90 => Orientation::Right,
            Exif::Rotate270FlipH => Orientation::RightMirrored,
            Exif::Rotate270 => Orientation::Left,
        }
    }
}

/// A decoded raster image together with its orientation tag.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub image: DynamicImage,
    pub orientation: Orientation,
}

impl RawImage {
    /// Wraps pixels that are already upright.
    pub fn upright(image: DynamicImage) -> Self {
        Self {
            image,
            orientation: Orientation::Up,
        }
    }

    pub fn with_orientation(image: DynamicImage, orientation: Orientation) -> Self {
        Self { image, orientation }
    }

    /// Stored pixel dimensions (before orientation is applied).
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Result of fitting an image into a bounding box.
#[derive(Debug, Clone)]
pub struct ScaledImageResult {
    /// The resampled image
    pub image: DynamicImage,
    /// Source image dimensions (width, height)
    pub original_dimensions: (u32, u32),
    /// Exact fractional size computed by the fit
    pub target_size: (f64, f64),
    /// Rendered pixel dimensions (width, height)
    pub new_dimensions: (u32, u32),
    /// Fit mode that produced the size
    pub fit_mode: FitMode,
    /// Processing time in milliseconds
    pub processing_time_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_validity() {
        assert!(BoundingBox::new(10.0, 10.0).is_valid());
        assert!(!BoundingBox::new(0.0, 10.0).is_valid());
        assert!(!BoundingBox::new(10.0, -1.0).is_valid());
        assert!(!BoundingBox::new(f64::NAN, 10.0).is_valid());
        assert!(!BoundingBox::new(f64::INFINITY, 10.0).is_valid());
    }

    #[test]
    fn test_exif_round_trip_covers_all_tags() {
        for value in 1..=8u8 {
            let orientation = Orientation::from_exif(value).unwrap();
            assert_eq!(orientation.to_exif(), value);
        }
        assert_eq!(Orientation::from_exif(0), None);
        assert_eq!(Orientation::from_exif(9), None);
    }

    #[test]
    fn test_parse_fit_mode_and_filter() {
        assert_eq!("contain".parse::<FitMode>(), Ok(FitMode::Contain));
        assert_eq!("Corner-Fit".parse::<FitMode>(), Ok(FitMode::CornerFit));
        assert!("stretch".parse::<FitMode>().is_err());

        assert_eq!(
            "bilinear".parse::<ResampleFilter>(),
            Ok(ResampleFilter::Bilinear)
        );
        assert_eq!(
            ResampleFilter::Bilinear.filter_type(),
            FilterType::Triangle
        );
        assert!("bicubic-ish".parse::<ResampleFilter>().is_err());
    }
}
