//! Hand-off record passed to the next stage of the capture flow.

use image::{DynamicImage, GenericImageView};
use serde::Serialize;

use crate::audio::AudioClipRef;

/// Reasons a hand-off is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandOffError {
    /// The caption is required and was left empty
    EmptyCaption,
}

impl std::fmt::Display for HandOffError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandOffError::EmptyCaption => write!(f, "Caption is required"),
        }
    }
}

impl std::error::Error for HandOffError {}

/// Everything the next stage needs, passed by value.
#[derive(Debug, Clone)]
pub struct Experience {
    pub caption: String,
    /// Filtered image; `None` when the filter could not process the source
    pub image: Option<DynamicImage>,
    pub audio_clip: Option<AudioClipRef>,
}

/// Serializable view of an [`Experience`] for logs and tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceSummary {
    pub caption: String,
    pub image_dimensions: Option<(u32, u32)>,
    pub audio_clip: Option<AudioClipRef>,
}

impl Experience {
    /// Builds the record, refusing an empty caption.
    ///
    /// Only the empty string is refused; whitespace counts as a caption.
    pub fn new(
        caption: impl Into<String>,
        image: Option<DynamicImage>,
        audio_clip: Option<AudioClipRef>,
    ) -> Result<Self, HandOffError> {
        let caption = caption.into();
        validate_caption(&caption)?;
        Ok(Self {
            caption,
            image,
            audio_clip,
        })
    }

    pub fn summary(&self) -> ExperienceSummary {
        ExperienceSummary {
            caption: self.caption.clone(),
            image_dimensions: self.image.as_ref().map(|image| image.dimensions()),
            audio_clip: self.audio_clip.clone(),
        }
    }
}

/// Checks that a caption may be submitted.
pub fn validate_caption(caption: &str) -> Result<(), HandOffError> {
    if caption.is_empty() {
        return Err(HandOffError::EmptyCaption);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_empty_caption_refused() {
        let result = Experience::new("", None, None);
        assert!(matches!(result, Err(HandOffError::EmptyCaption)));
    }

    #[test]
    fn test_whitespace_caption_accepted() {
        assert!(validate_caption(" ").is_ok());
    }

    #[test]
    fn test_summary_serializes() {
        let experience = Experience::new(
            "Beach day",
            Some(DynamicImage::ImageRgb8(RgbImage::new(3, 2))),
            Some(AudioClipRef::new("/tmp/clip.wav")),
        )
        .unwrap();

        let summary = experience.summary();
        assert_eq!(summary.image_dimensions, Some((3, 2)));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["caption"], "Beach day");
        assert_eq!(json["image_dimensions"], serde_json::json!([3, 2]));
        assert_eq!(json["audio_clip"], "/tmp/clip.wav");
    }
}
