//! # Audio Capture Module
//!
//! Recording is owned by the platform; the composer talks to it through the
//! [`AudioCapture`] and [`PermissionGate`] traits.
//!
//! - `recorder`: WAV-backed capture that writes pushed PCM samples
//! - `permission`: microphone permission states and the denial prompt

pub mod permission;
pub mod recorder;

use std::path::{Path, PathBuf};

use serde::Serialize;

pub use permission::{PermissionGate, PermissionPrompt, PromptAction, RecordPermission, StaticPermissionGate};
pub use recorder::{RecordingFormat, WavRecorder, RECORDING_EXTENSION};

/// Errors that can occur while capturing audio.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// The user has denied microphone access
    PermissionDenied,
    /// The recording file could not be created or written
    Io { message: String },
    /// The encoder rejected samples or could not finalize the container
    Encode { message: String },
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::PermissionDenied => write!(f, "Microphone access has been denied"),
            AudioError::Io { message } => write!(f, "Recording file error: {}", message),
            AudioError::Encode { message } => write!(f, "Recording encode error: {}", message),
        }
    }
}

impl std::error::Error for AudioError {}

/// Path of a recorded clip. The file itself belongs to the capture service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AudioClipRef(PathBuf);

impl AudioClipRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for AudioClipRef {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for AudioClipRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A service that records audio into files it owns.
pub trait AudioCapture {
    /// Starts a new recording. The returned path is fixed for the lifetime of the clip.
    fn start(&mut self) -> Result<AudioClipRef, AudioError>;

    /// Stops the current recording and returns its clip; no-op when idle.
    fn stop(&mut self) -> Result<Option<AudioClipRef>, AudioError>;

    fn is_recording(&self) -> bool;

    /// Clip of the last recording that was stopped and written out completely.
    ///
    /// Cleared when a new recording starts; a failed stop or an abandoned
    /// recording leaves it empty.
    fn finalized_clip(&self) -> Option<&AudioClipRef>;
}
