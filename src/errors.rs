//! # Application Error Types
//!
//! This module defines common error types used throughout the capture flow.
//! Module-level errors (`ImagingError`, `AudioError`, `HandOffError`) convert
//! into the `AppError` categories below.

use std::fmt;

use crate::audio::AudioError;
use crate::handoff::HandOffError;
use crate::imaging::ImagingError;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Validation errors (captions, inputs, etc.)
    Validation(String),
    /// Image decoding, scaling or filtering errors
    Imaging(String),
    /// Audio capture errors
    Audio(String),
    /// File system errors
    FileSystem(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Imaging(msg) => write!(f, "[IMAGING] {}", msg),
            AppError::Audio(msg) => write!(f, "[AUDIO] {}", msg),
            AppError::FileSystem(msg) => write!(f, "[FILESYSTEM] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ImagingError> for AppError {
    fn from(err: ImagingError) -> Self {
        AppError::Imaging(err.to_string())
    }
}

impl From<AudioError> for AppError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Io { .. } => AppError::FileSystem(err.to_string()),
            _ => AppError::Audio(err.to_string()),
        }
    }
}

impl From<HandOffError> for AppError {
    fn from(err: HandOffError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log image processing errors with dimension context
    pub fn log_imaging_error(
        error: &impl std::fmt::Display,
        operation: &str,
        image_dimensions: Option<(u32, u32)>,
        target: Option<(f64, f64)>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            image_dimensions = ?image_dimensions,
            target = ?target,
            "Image processing failed"
        );
    }

    /// Log audio capture errors with recording context
    pub fn log_audio_error(
        error: &impl std::fmt::Display,
        operation: &str,
        clip_path: Option<&str>,
        samples_written: Option<u64>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            clip_path = ?clip_path,
            samples_written = ?samples_written,
            "Audio capture failed"
        );
    }

    /// Log file system errors with path and operation context
    pub fn log_filesystem_error(
        error: &impl std::fmt::Display,
        operation: &str,
        path: Option<&str>,
        file_size: Option<u64>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            path = ?path,
            file_size_bytes = ?file_size,
            "File system operation failed"
        );
    }

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            input_type = %input_type,
            input_value = ?input_value.map(|v| if v.chars().count() > 100 { format!("{}...", v.chars().take(100).collect::<String>()) } else { v.to_string() }),
            "Validation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            AppError::Config("bad".to_string()).to_string(),
            "[CONFIG] bad"
        );
        assert_eq!(
            AppError::Audio("mic".to_string()).to_string(),
            "[AUDIO] mic"
        );
    }

    #[test]
    fn test_imaging_error_conversion() {
        let err: AppError = ImagingError::InvalidTarget {
            width: 0.0,
            height: 10.0,
        }
        .into();
        assert!(matches!(err, AppError::Imaging(_)));
    }

    #[test]
    fn test_audio_io_error_maps_to_filesystem() {
        let err: AppError = AudioError::Io {
            message: "disk full".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::FileSystem(_)));

        let err: AppError = AudioError::PermissionDenied.into();
        assert!(matches!(err, AppError::Audio(_)));
    }
}
