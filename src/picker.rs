//! Media picker collaborator.
//!
//! The photo source is owned by the platform; the composer only sees this trait.

use std::collections::VecDeque;
use std::path::PathBuf;

use tracing::info;

use crate::imaging::{load_image, ImagingError, RawImage};

/// Outcome of a user-driven pick.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    Picked(RawImage),
    Cancelled,
}

/// A source the user can pick photos from.
pub trait MediaPicker {
    /// Whether the source can be presented at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Presents the source and waits for the user's choice.
    fn pick(&mut self) -> Result<PickOutcome, ImagingError>;
}

/// Picks images from files queued by the caller.
///
/// Each `pick` consumes the next queued path; an empty queue means the user
/// dismissed the picker.
#[derive(Debug, Default)]
pub struct FilePicker {
    queue: VecDeque<PathBuf>,
}

impl FilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let mut picker = Self::new();
        picker.enqueue(path);
        picker
    }

    pub fn enqueue(&mut self, path: impl Into<PathBuf>) {
        self.queue.push_back(path.into());
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl MediaPicker for FilePicker {
    fn pick(&mut self) -> Result<PickOutcome, ImagingError> {
        match self.queue.pop_front() {
            Some(path) => {
                let raw = load_image(&path)?;
                info!(path = %path.display(), "Picked image");
                Ok(PickOutcome::Picked(raw))
            }
            None => {
                info!("Image pick cancelled");
                Ok(PickOutcome::Cancelled)
            }
        }
    }
}
