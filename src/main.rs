use anyhow::{Context, Result};
use clap::Parser;
use experience_capture::audio::{RecordPermission, StaticPermissionGate, WavRecorder};
use experience_capture::config::AppConfig;
use experience_capture::picker::FilePicker;
use experience_capture::{observability, Collaborators, ExperienceComposer, RecordingAction};
use hound::{SampleFormat, WavReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Compose an experience from a photo, an optional audio clip and a caption.
#[derive(Parser, Debug)]
#[command(name = "experience-capture")]
#[command(about = "📷 Fit a photo to the screen, render it in black and white and hand it off with a caption")]
#[command(long_about = "Fit a photo to the screen, render it in black and white and hand it off with a caption.
Optionally records audio by replaying a WAV source into a new timestamped clip.")]
struct Args {
    /// Image to pick; omit to hand off the placeholder
    #[arg(short, long, help = "Image file to pick from (JPEG, PNG, ...)")]
    image: Option<PathBuf>,

    /// Caption for the experience
    #[arg(short, long, help = "Caption handed off with the image (required, may not be empty)")]
    caption: String,

    /// Viewport width in points
    #[arg(long, default_value_t = 375.0, help = "Width of the image view in points")]
    width: f64,

    /// Viewport height in points
    #[arg(long, default_value_t = 300.0, help = "Height of the image view in points")]
    height: f64,

    /// WAV file replayed as microphone input
    #[arg(short, long, help = "WAV file whose samples are recorded as the audio clip")]
    audio_source: Option<PathBuf>,

    /// Microphone permission state
    #[arg(long, default_value = "granted", help = "Microphone permission: granted, denied or undetermined")]
    permission: RecordPermission,

    /// Answer given when permission is requested
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set,
          help = "Whether the user grants access when asked (only used when undetermined)")]
    grant: bool,

    /// Where to write the filtered image
    #[arg(short, long, default_value = "experience.png", help = "Output path for the black and white image")]
    output: PathBuf,

    /// Print a metrics snapshot after the hand-off
    #[arg(long, help = "Print Prometheus metrics on exit (requires ENABLE_METRICS=true)")]
    print_metrics: bool,
}

/// Reads a WAV file as interleaved `f32` samples, downmixed to `channels`.
fn read_source_samples(path: &Path, channels: u16, sample_rate: u32) -> Result<Vec<f32>> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open audio source {}", path.display()))?;
    let spec = reader.spec();

    if spec.sample_rate != sample_rate {
        warn!(
            source_rate = spec.sample_rate,
            recording_rate = sample_rate,
            "Audio source sample rate differs from recording format; samples are copied as-is"
        );
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<_, _>>()?
        }
    };

    let source_channels = spec.channels.max(1) as usize;
    if source_channels == channels as usize {
        return Ok(samples);
    }

    // Average each frame down to mono, then duplicate for the target layout
    let out = samples
        .chunks(source_channels)
        .flat_map(|frame| {
            let mono = frame.iter().sum::<f32>() / frame.len() as f32;
            std::iter::repeat(mono).take(channels as usize)
        })
        .collect();
    Ok(out)
}

fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = AppConfig::from_env()?;
    config.validate()?;

    let metrics_handle = observability::init_observability_with_config(&config.observability)?;
    info!("{}", config.summary());

    let picker = match &args.image {
        Some(path) => FilePicker::with_path(path),
        None => FilePicker::new(),
    };
    let recorder = WavRecorder::new(&config.audio.recordings_dir, config.audio.format);
    let permissions = StaticPermissionGate::new(args.permission).answering(args.grant);

    let mut composer = ExperienceComposer::new(
        &config,
        args.width,
        args.height,
        Collaborators {
            picker: Box::new(picker),
            recorder,
            permissions: Box::new(permissions),
        },
    )?;

    if composer.add_image()? {
        if let Some(scaled) = composer.scaled_image() {
            info!(
                original = ?scaled.original_dimensions,
                scaled = ?scaled.new_dimensions,
                bounds = ?composer.bounds(),
                "Image fitted to viewport"
            );
        }
    }

    if let Some(source) = &args.audio_source {
        let format = config.audio.format;
        let samples = read_source_samples(source, format.channels, format.sample_rate)?;

        let mut action = composer.toggle_recording()?;
        if let RecordingAction::PermissionRequested { granted: true } = action {
            action = composer.toggle_recording()?;
        }

        match action {
            RecordingAction::Started(clip) => {
                let written = composer.recorder_mut().write_samples(&samples)?;
                info!(clip = %clip, samples = written, "Audio source recorded");
                composer.toggle_recording()?;
            }
            RecordingAction::PermissionDenied(prompt) => {
                eprintln!("{}\n{}", prompt.title, prompt.message);
            }
            RecordingAction::PermissionRequested { granted: false } => {
                eprintln!("{}", composer.message("microphone-permission-refused", &[]));
            }
            other => warn!(action = ?other, "Unexpected recording state"),
        }
    }

    composer.set_caption(args.caption);
    let experience = match composer.hand_off() {
        Ok(experience) => experience,
        Err(e) => {
            eprintln!("{}", composer.message("caption-required", &[]));
            return Err(e.into());
        }
    };

    if let Some(image) = &experience.image {
        image
            .save(&args.output)
            .with_context(|| format!("Failed to write {}", args.output.display()))?;
        info!(path = %args.output.display(), "Filtered image written");
    }

    println!("{}", serde_json::to_string_pretty(&experience.summary())?);

    if args.print_metrics {
        match &metrics_handle {
            Some(handle) => println!("{}", handle.render()),
            None => warn!("Metrics are disabled; set ENABLE_METRICS=true"),
        }
    }

    Ok(())
}
