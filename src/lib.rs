//! # Experience Capture
//!
//! Picks a photo, fits it to the display, renders it in black and white,
//! records an optional audio clip, and hands the result with a caption to the
//! next stage of the flow.

pub mod audio;
pub mod composer;
pub mod config;
pub mod errors;
pub mod filenames;
pub mod handoff;
pub mod imaging;
pub mod localization;
pub mod observability;
pub mod observability_config;
pub mod picker;

// Re-export types for easier access
pub use composer::{Collaborators, ExperienceComposer, RecordingAction};
pub use handoff::{Experience, ExperienceSummary, HandOffError};
pub use imaging::{BoundingBox, ImageScaler, ImagingError, RawImage};
