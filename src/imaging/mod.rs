//! # Imaging Module
//!
//! Image handling for the capture flow: decoding with orientation, orientation
//! normalization, fitting into the display bounds, and color filtering.
//!
//! - `loading`: decoding from disk or memory
//! - `orientation`: rendering pixels upright
//! - `scaling`: bounding-box fit and resampling
//! - `filtering`: color controls and the grayscale filter
//! - `types`: shared types and error definitions

pub mod filtering;
pub mod loading;
pub mod orientation;
pub mod scaling;
pub mod types;

pub use types::{
    BoundingBox, FitMode, ImagingError, Orientation, RawImage, ResampleFilter, ScaledImageResult,
};

pub use filtering::{to_grayscale, ColorControls};
pub use loading::{load_image, load_image_from_memory};
pub use orientation::{flatten, render_upright};
pub use scaling::{fit_size, ImageScaler, MAX_TARGET_DIMENSION};
