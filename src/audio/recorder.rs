//! WAV-backed audio capture.
//!
//! The platform input stream pushes `f32` samples in [-1.0, 1.0]; they are
//! stored as integer PCM in a file named after the local start time.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;
use hound::{SampleFormat, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AudioCapture, AudioClipRef, AudioError};
use crate::errors::error_logging;
use crate::filenames::{timestamped_filename, validate_filename};
use crate::observability;

/// File extension used for recorded clips.
pub const RECORDING_EXTENSION: &str = "wav";

/// PCM layout of recorded clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for RecordingFormat {
    /// 44.1 kHz mono, 16-bit
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl RecordingFormat {
    fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

struct ActiveRecording {
    writer: WavWriter<BufWriter<File>>,
    clip: AudioClipRef,
    samples_written: u64,
}

/// Records clips into a directory as WAV files.
pub struct WavRecorder {
    directory: PathBuf,
    format: RecordingFormat,
    active: Option<ActiveRecording>,
    finalized: Option<AudioClipRef>,
}

impl std::fmt::Debug for WavRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavRecorder")
            .field("directory", &self.directory)
            .field("format", &self.format)
            .field("recording", &self.active.as_ref().map(|a| &a.clip))
            .field("finalized", &self.finalized)
            .finish()
    }
}

impl WavRecorder {
    pub fn new(directory: impl Into<PathBuf>, format: RecordingFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
            active: None,
            finalized: None,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn format(&self) -> RecordingFormat {
        self.format
    }

    /// Clip currently being written, if any.
    pub fn current_clip(&self) -> Option<&AudioClipRef> {
        self.active.as_ref().map(|active| &active.clip)
    }

    /// Appends interleaved samples to the current recording.
    ///
    /// Returns the number of samples written; zero when not recording. An encode
    /// failure abandons the recording.
    pub fn write_samples(&mut self, samples: &[f32]) -> Result<usize, AudioError> {
        let Some(active) = self.active.as_mut() else {
            debug!(count = samples.len(), "Dropping samples: not recording");
            return Ok(0);
        };

        let max = max_amplitude(self.format.bits_per_sample);
        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * max) as i32;
            if let Err(e) = active.writer.write_sample(value) {
                let clip = active.clip.to_string();
                let written = active.samples_written;
                error_logging::log_audio_error(&e, "write_samples", Some(&clip), Some(written));
                observability::record_recording_event("encode_error");
                self.active = None;
                return Err(map_hound_error(e));
            }
            active.samples_written += 1;
        }

        Ok(samples.len())
    }

    /// Picks a file path for a recording started now, avoiding existing files.
    fn next_clip_path(&self) -> PathBuf {
        let name = timestamped_filename(&Local::now(), RECORDING_EXTENSION);
        let candidate = self.directory.join(&name);
        if !candidate.exists() {
            return candidate;
        }

        let stem = name
            .strip_suffix(&format!(".{}", RECORDING_EXTENSION))
            .unwrap_or(&name)
            .to_string();
        (1u32..)
            .map(|n| {
                self.directory
                    .join(format!("{}-{}.{}", stem, n, RECORDING_EXTENSION))
            })
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }
}

impl AudioCapture for WavRecorder {
    fn start(&mut self) -> Result<AudioClipRef, AudioError> {
        if self.active.is_some() {
            self.stop()?;
        }

        fs::create_dir_all(&self.directory).map_err(|e| {
            let dir = self.directory.display().to_string();
            error_logging::log_filesystem_error(&e, "create_recordings_dir", Some(&dir), None);
            AudioError::Io {
                message: e.to_string(),
            }
        })?;

        let path = self.next_clip_path();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        validate_filename(&name).map_err(|e| {
            error_logging::log_validation_error(&e, "start_recording", "clip_filename", Some(&name));
            AudioError::Io {
                message: format!("{}: {}", e, name),
            }
        })?;

        let writer = WavWriter::create(&path, self.format.wav_spec()).map_err(|e| {
            let display = path.display().to_string();
            error_logging::log_audio_error(&e, "start_recording", Some(&display), None);
            map_hound_error(e)
        })?;

        let clip = AudioClipRef::new(path);
        info!(
            clip = %clip,
            sample_rate = self.format.sample_rate,
            channels = self.format.channels,
            "Recording started"
        );
        observability::record_recording_event("started");

        self.finalized = None;
        self.active = Some(ActiveRecording {
            writer,
            clip: clip.clone(),
            samples_written: 0,
        });

        Ok(clip)
    }

    fn stop(&mut self) -> Result<Option<AudioClipRef>, AudioError> {
        let Some(active) = self.active.take() else {
            return Ok(None);
        };

        let ActiveRecording {
            writer,
            clip,
            samples_written,
        } = active;

        writer.finalize().map_err(|e| {
            let display = clip.to_string();
            error_logging::log_audio_error(&e, "stop_recording", Some(&display), Some(samples_written));
            map_hound_error(e)
        })?;

        info!(clip = %clip, samples_written, "Recording stopped");
        observability::record_recording_event("stopped");

        self.finalized = Some(clip.clone());
        Ok(Some(clip))
    }

    fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    fn finalized_clip(&self) -> Option<&AudioClipRef> {
        self.finalized.as_ref()
    }
}

fn max_amplitude(bits_per_sample: u16) -> f32 {
    ((1i64 << (bits_per_sample.clamp(8, 32) - 1)) - 1) as f32
}

fn map_hound_error(err: hound::Error) -> AudioError {
    match err {
        hound::Error::IoError(e) => AudioError::Io {
            message: e.to_string(),
        },
        other => AudioError::Encode {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_cd_rate_mono() {
        let format = RecordingFormat::default();
        assert_eq!(format.sample_rate, 44_100);
        assert_eq!(format.channels, 1);
        assert_eq!(format.bits_per_sample, 16);
    }

    #[test]
    fn test_max_amplitude() {
        assert_eq!(max_amplitude(16), i16::MAX as f32);
        assert_eq!(max_amplitude(8), i8::MAX as f32);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = WavRecorder::new(dir.path(), RecordingFormat::default());
        assert_eq!(recorder.stop().unwrap(), None);
        assert_eq!(recorder.stop().unwrap(), None);
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_samples_ignored_when_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = WavRecorder::new(dir.path(), RecordingFormat::default());
        assert_eq!(recorder.write_samples(&[0.1, 0.2]).unwrap(), 0);
    }

    #[test]
    fn test_record_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = WavRecorder::new(dir.path().join("clips"), RecordingFormat::default());

        let clip = recorder.start().unwrap();
        assert!(recorder.is_recording());
        assert_eq!(recorder.current_clip(), Some(&clip));
        assert_eq!(recorder.write_samples(&[0.0, 0.5, -0.5, 2.0]).unwrap(), 4);

        let stopped = recorder.stop().unwrap();
        assert_eq!(stopped.as_ref(), Some(&clip));
        assert!(!recorder.is_recording());

        let mut reader = hound::WavReader::open(clip.path()).unwrap();
        assert_eq!(reader.spec().sample_rate, 44_100);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 16383, -16383, i16::MAX]);
    }

    #[test]
    fn test_finalized_clip_tracks_last_complete_recording() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = WavRecorder::new(dir.path(), RecordingFormat::default());
        assert_eq!(recorder.finalized_clip(), None);

        let first = recorder.start().unwrap();
        assert_eq!(recorder.finalized_clip(), None);
        recorder.stop().unwrap();
        assert_eq!(recorder.finalized_clip(), Some(&first));

        let second = recorder.start().unwrap();
        assert_eq!(recorder.finalized_clip(), None);
        recorder.stop().unwrap();
        assert_eq!(recorder.finalized_clip(), Some(&second));
    }

    #[test]
    fn test_restart_uses_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = WavRecorder::new(dir.path(), RecordingFormat::default());

        let first = recorder.start().unwrap();
        let second = recorder.start().unwrap();
        assert_ne!(first, second);
        assert!(first.path().exists());
        recorder.stop().unwrap();
        assert!(second.path().exists());
    }
}
