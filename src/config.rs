//! # Unified Application Configuration
//!
//! This module provides a centralized configuration system that consolidates
//! all application settings into a single, structured configuration object.
//! It supports loading from environment variables, validation, and provides
//! a clean interface for accessing configuration throughout the application.

use crate::audio::RecordingFormat;
use crate::errors::{error_logging, AppError, AppResult};
use crate::imaging::{FitMode, ResampleFilter};
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Image fitting and filtering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagingConfig {
    /// Device pixel density multiplier applied to viewport sizes (1x, 2x, 3x...)
    pub display_scale: f64,
    /// Resampling filter for scaled images
    pub resample_filter: ResampleFilter,
    /// How target sizes are derived from the bounding box
    pub fit_mode: FitMode,
    /// Image handed off when no photo was picked; a neutral gray tile when unset
    pub placeholder_path: Option<PathBuf>,
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            display_scale: 2.0,
            resample_filter: ResampleFilter::Bilinear,
            fit_mode: FitMode::CornerFit,
            placeholder_path: None,
        }
    }
}

impl ImagingConfig {
    /// Validate imaging configuration
    pub fn validate(&self) -> AppResult<()> {
        if !self.display_scale.is_finite() || self.display_scale <= 0.0 {
            return Err(AppError::Config(format!(
                "Display scale must be positive, got {}",
                self.display_scale
            )));
        }

        if self.display_scale > 10.0 {
            return Err(AppError::Config(
                "Display scale cannot be greater than 10".to_string(),
            ));
        }

        if let Some(path) = &self.placeholder_path {
            if path.as_os_str().is_empty() {
                return Err(AppError::Config(
                    "Placeholder image path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Audio recording settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Directory recordings are written to
    pub recordings_dir: PathBuf,
    /// PCM layout of recordings
    pub format: RecordingFormat,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let recordings_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("experience-recordings");

        Self {
            recordings_dir,
            format: RecordingFormat::default(),
        }
    }
}

impl AudioConfig {
    /// Validate audio configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.recordings_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Recordings directory cannot be empty".to_string(),
            ));
        }

        if !(8_000..=192_000).contains(&self.format.sample_rate) {
            return Err(AppError::Config(format!(
                "Sample rate {} is outside 8000-192000 Hz",
                self.format.sample_rate
            )));
        }

        if !(1..=2).contains(&self.format.channels) {
            return Err(AppError::Config(format!(
                "Channel count must be 1 or 2, got {}",
                self.format.channels
            )));
        }

        if ![8, 16, 24, 32].contains(&self.format.bits_per_sample) {
            return Err(AppError::Config(format!(
                "Unsupported bit depth: {}",
                self.format.bits_per_sample
            )));
        }

        Ok(())
    }
}

/// User interface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Platform language tag used for prompts ("en", "fr-FR", ...)
    pub language: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

impl UiConfig {
    /// Validate UI configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.language.trim().is_empty() {
            return Err(AppError::Config("UI language cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Imaging configuration
    pub imaging: ImagingConfig,
    /// Audio configuration
    pub audio: AudioConfig,
    /// UI configuration
    pub ui: UiConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

fn parse_env<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| {
            let err = AppError::Config(format!("{} has an invalid value: {}", key, value));
            error_logging::log_config_error(&err, key, "from_env");
            err
        }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        // Load imaging configuration
        config.imaging.display_scale = parse_env("DISPLAY_SCALE", config.imaging.display_scale)?;
        config.imaging.resample_filter =
            parse_env("RESAMPLE_FILTER", config.imaging.resample_filter)?;
        config.imaging.fit_mode = parse_env("FIT_MODE", config.imaging.fit_mode)?;
        config.imaging.placeholder_path = env::var("PLACEHOLDER_IMAGE_PATH").ok().map(PathBuf::from);

        // Load audio configuration
        if let Ok(dir) = env::var("RECORDINGS_DIR") {
            config.audio.recordings_dir = PathBuf::from(dir);
        }
        config.audio.format.sample_rate =
            parse_env("AUDIO_SAMPLE_RATE", config.audio.format.sample_rate)?;
        config.audio.format.channels = parse_env("AUDIO_CHANNELS", config.audio.format.channels)?;

        // Load UI configuration
        if let Ok(language) = env::var("UI_LANGUAGE") {
            config.ui.language = language;
        }

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.imaging.validate()?;
        self.audio.validate()?;
        self.ui.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: display_scale={}, fit_mode={:?}, resample_filter={:?}, recordings_dir={}, sample_rate={}, channels={}, language={}, environment={}",
            self.imaging.display_scale,
            self.imaging.fit_mode,
            self.imaging.resample_filter,
            self.audio.recordings_dir.display(),
            self.audio.format.sample_rate,
            self.audio.format.channels,
            self.ui.language,
            self.observability.environment
        )
    }
}
