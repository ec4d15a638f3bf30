//! Screen state for composing an experience: a picked photo fitted to the
//! display and filtered, an optional audio clip, and a caption.
//!
//! Derived images are recomputed by the setters that change their inputs;
//! nothing is updated behind the caller's back.

use image::{DynamicImage, Rgb, RgbImage};
use tracing::{debug, info, warn};

use crate::audio::{
    AudioCapture, AudioClipRef, AudioError, PermissionGate, PermissionPrompt, RecordPermission,
};
use crate::config::AppConfig;
use crate::errors::{error_logging, AppResult};
use crate::handoff::{validate_caption, Experience, HandOffError};
use crate::imaging::{
    flatten, load_image, to_grayscale, BoundingBox, ImageScaler, ImagingError, RawImage,
    ScaledImageResult,
};
use crate::localization::LocalizationManager;
use crate::observability;
use crate::picker::{MediaPicker, PickOutcome};

/// Side length of the generated placeholder tile.
const PLACEHOLDER_SIZE: u32 = 64;

/// External services the composer drives.
pub struct Collaborators<A: AudioCapture> {
    pub picker: Box<dyn MediaPicker>,
    pub recorder: A,
    pub permissions: Box<dyn PermissionGate>,
}

/// What a tap on the record button did.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingAction {
    Started(AudioClipRef),
    Stopped(Option<AudioClipRef>),
    /// Permission was just requested; the user has to tap again to record
    PermissionRequested { granted: bool },
    /// Access is denied; the prompt must be shown to the user
    PermissionDenied(PermissionPrompt),
}

pub struct ExperienceComposer<A: AudioCapture> {
    scaler: ImageScaler,
    display_scale: f64,
    bounds: BoundingBox,
    picker: Box<dyn MediaPicker>,
    recorder: A,
    permissions: Box<dyn PermissionGate>,
    localization: LocalizationManager,
    language: String,
    placeholder: DynamicImage,
    original_image: Option<RawImage>,
    scaled_image: Option<ScaledImageResult>,
    display_image: Option<DynamicImage>,
    caption: String,
    recording: Option<AudioClipRef>,
}

impl<A: AudioCapture> ExperienceComposer<A> {
    /// Creates a composer for a viewport of `viewport_width` x `viewport_height` points.
    pub fn new(
        config: &AppConfig,
        viewport_width: f64,
        viewport_height: f64,
        collaborators: Collaborators<A>,
    ) -> AppResult<Self> {
        let localization = LocalizationManager::new()?;
        let language = localization.detect_language(Some(&config.ui.language));
        let placeholder = load_placeholder(config)?;
        let display_scale = config.imaging.display_scale;

        let Collaborators {
            picker,
            recorder,
            permissions,
        } = collaborators;

        Ok(Self {
            scaler: ImageScaler::with_options(
                config.imaging.fit_mode,
                config.imaging.resample_filter,
            ),
            display_scale,
            bounds: BoundingBox::from_viewport(viewport_width, viewport_height, display_scale),
            picker,
            recorder,
            permissions,
            localization,
            language,
            placeholder,
            original_image: None,
            scaled_image: None,
            display_image: None,
            caption: String::new(),
            recording: None,
        })
    }

    /// Bounding box in device pixels.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Upright copy of the last picked image.
    pub fn original_image(&self) -> Option<&RawImage> {
        self.original_image.as_ref()
    }

    pub fn scaled_image(&self) -> Option<&ScaledImageResult> {
        self.scaled_image.as_ref()
    }

    /// Filtered image currently shown to the user.
    pub fn display_image(&self) -> Option<&DynamicImage> {
        self.display_image.as_ref()
    }

    pub fn placeholder(&self) -> &DynamicImage {
        &self.placeholder
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Clip of the latest recording, fixed when it started.
    ///
    /// Dropped when stopping fails or the recorder abandons the clip.
    pub fn recording(&self) -> Option<&AudioClipRef> {
        self.recording.as_ref()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn recorder(&self) -> &A {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut A {
        &mut self.recorder
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Localized message for the composer's language.
    pub fn message(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.localization
            .get_message_with_args_in_language(key, &self.language, args)
    }

    /// Resizes the viewport and re-derives the scaled image.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.bounds = BoundingBox::from_viewport(width, height, self.display_scale);
        debug!(bounds = ?self.bounds, "Viewport changed");
        self.rederive_scaled_image();
    }

    /// Replaces the picked image and re-derives everything that depends on it.
    pub fn set_original_image(&mut self, raw: RawImage) {
        let upright = flatten(&raw).into_owned();
        self.original_image = Some(upright);
        self.rederive_scaled_image();
    }

    /// Drops the picked image and its derived images.
    pub fn clear_image(&mut self) {
        self.original_image = None;
        self.rederive_scaled_image();
    }

    fn rederive_scaled_image(&mut self) {
        self.scaled_image = match &self.original_image {
            None => None,
            Some(original) => {
                let _span = observability::imaging_span("fit").entered();
                let start = std::time::Instant::now();
                match self.scaler.fit(&original.image, self.bounds) {
                    Ok(scaled) => {
                        let (w, h) = scaled.new_dimensions;
                        observability::record_scale_metrics(start.elapsed(), w as u64 * h as u64);
                        Some(scaled)
                    }
                    Err(e) => {
                        error_logging::log_imaging_error(
                            &e,
                            "fit",
                            Some(original.dimensions()),
                            Some((self.bounds.width, self.bounds.height)),
                        );
                        observability::record_error_metrics("fit", "imaging");
                        None
                    }
                }
            }
        };
        self.update_display_image();
    }

    fn update_display_image(&mut self) {
        self.display_image = self
            .scaled_image
            .as_ref()
            .and_then(|scaled| to_grayscale(&scaled.image));
    }

    /// Presents the picker. Returns whether a new image was taken.
    ///
    /// A cancelled pick leaves the current image untouched.
    pub fn add_image(&mut self) -> Result<bool, ImagingError> {
        let _span = observability::composer_span("add_image").entered();

        if !self.picker.is_available() {
            warn!("{}", self.message("photo-library-unavailable", &[]));
            return Ok(false);
        }

        match self.picker.pick()? {
            PickOutcome::Picked(raw) => {
                info!(dimensions = ?raw.dimensions(), orientation = ?raw.orientation, "Image picked");
                self.set_original_image(raw);
                Ok(true)
            }
            PickOutcome::Cancelled => {
                debug!("Picker dismissed without a selection");
                Ok(false)
            }
        }
    }

    /// Record button handler: stops a running recording, otherwise goes through
    /// the permission check and starts one.
    pub fn toggle_recording(&mut self) -> Result<RecordingAction, AudioError> {
        let _span = observability::audio_span("toggle_recording").entered();

        if self.recorder.is_recording() {
            let clip = match self.recorder.stop() {
                Ok(clip) => clip,
                Err(e) => {
                    let clip = self.recording.take().map(|clip| clip.to_string());
                    error_logging::log_audio_error(&e, "stop_recording", clip.as_deref(), None);
                    observability::record_error_metrics("stop_recording", "audio");
                    return Err(e);
                }
            };
            if let Some(clip) = &clip {
                let clip_name = clip.to_string();
                info!("{}", self.message("recording-stopped", &[("clip", clip_name.as_str())]));
            }
            return Ok(RecordingAction::Stopped(clip));
        }

        match self.permissions.status() {
            RecordPermission::Granted => {
                let clip = self.recorder.start()?;
                let clip_name = clip.to_string();
                info!("{}", self.message("recording-started", &[("clip", clip_name.as_str())]));
                self.recording = Some(clip.clone());
                Ok(RecordingAction::Started(clip))
            }
            RecordPermission::Undetermined => {
                let granted = self.permissions.request_access();
                if granted {
                    info!("{}", self.message("microphone-permission-requested", &[]));
                } else {
                    warn!("{}", self.message("microphone-permission-refused", &[]));
                }
                Ok(RecordingAction::PermissionRequested { granted })
            }
            RecordPermission::Denied => {
                warn!(error = %AudioError::PermissionDenied, "Recording not started");
                observability::record_error_metrics("permission_denied", "audio");
                Ok(RecordingAction::PermissionDenied(
                    PermissionPrompt::microphone_denied(&self.localization, &self.language),
                ))
            }
        }
    }

    /// Bundles caption, filtered image and clip for the next stage.
    ///
    /// Refused when the caption is empty. A running recording is finalized first so
    /// the referenced file is complete, and a clip that was never finalized is left
    /// out. The placeholder stands in for a missing photo.
    pub fn hand_off(&mut self) -> Result<Experience, HandOffError> {
        let _span = observability::composer_span("hand_off").entered();

        if let Err(e) = validate_caption(&self.caption) {
            error_logging::log_validation_error(&e, "hand_off", "caption", Some(self.caption.as_str()));
            observability::record_hand_off(false);
            return Err(e);
        }

        if self.recorder.is_recording() {
            if let Err(e) = self.recorder.stop() {
                let clip = self.recording.as_ref().map(|clip| clip.to_string());
                error_logging::log_audio_error(&e, "hand_off_stop", clip.as_deref(), None);
                observability::record_error_metrics("hand_off_stop", "audio");
            }
        }
        self.discard_incomplete_recording();

        let source = self
            .scaled_image
            .as_ref()
            .map(|scaled| &scaled.image)
            .unwrap_or(&self.placeholder);
        let image = to_grayscale(source);

        let experience = Experience::new(self.caption.clone(), image, self.recording.clone())?;
        observability::record_hand_off(true);
        info!(
            "{}",
            self.message("hand-off-ready", &[("caption", experience.caption.as_str())])
        );

        Ok(experience)
    }

    /// Forgets the clip reference unless the recorder wrote that clip out completely.
    fn discard_incomplete_recording(&mut self) {
        let Some(clip) = &self.recording else {
            return;
        };
        if self.recorder.finalized_clip() != Some(clip) {
            warn!(clip = %clip, "Recording was not finalized; leaving it out of the hand-off");
            self.recording = None;
        }
    }
}

/// Loads the configured placeholder or generates a neutral gray tile.
pub fn load_placeholder(config: &AppConfig) -> AppResult<DynamicImage> {
    match &config.imaging.placeholder_path {
        Some(path) => {
            let raw = load_image(path)?;
            Ok(flatten(&raw).into_owned().image)
        }
        None => Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            PLACEHOLDER_SIZE,
            PLACEHOLDER_SIZE,
            Rgb([128, 128, 128]),
        ))),
    }
}
