//! Observability module for logging and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - A local Prometheus recorder whose snapshot can be rendered on demand
//! - Span constructors and metric recording helpers for the capture flow

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

/// Initialize logging and, when enabled, the metrics recorder.
///
/// Returns the Prometheus handle so callers can render a snapshot.
pub fn init_observability_with_config(
    config: &ObservabilityConfig,
) -> Result<Option<PrometheusHandle>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;

    let handle = if config.enable_metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    tracing::info!(
        environment = %config.environment,
        metrics_enabled = %handle.is_some(),
        "Observability initialized"
    );

    Ok(handle)
}

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("experience_capture={}", config.log_level.to_lowercase()).parse()?);

    if config.use_pretty_logs() {
        // Pretty formatting for development
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        // JSON formatting for production (default)
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install a global Prometheus recorder without an HTTP listener
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;
    Ok(handle)
}

/// Create a span for image operations
pub fn imaging_span(operation: &str) -> tracing::Span {
    tracing::info_span!("imaging_operation", operation = operation, component = "imaging")
}

/// Create a span for audio capture operations
pub fn audio_span(operation: &str) -> tracing::Span {
    tracing::info_span!("audio_operation", operation = operation, component = "audio")
}

/// Create a span for composer (screen state) operations
pub fn composer_span(operation: &str) -> tracing::Span {
    tracing::info_span!("composer_operation", operation = operation, component = "composer")
}

/// Record a completed image fit
pub fn record_scale_metrics(duration: std::time::Duration, output_pixels: u64) {
    metrics::counter!("images_scaled_total").increment(1);
    metrics::histogram!("image_scale_duration_seconds").record(duration.as_secs_f64());
    metrics::histogram!("image_scaled_pixels").record(output_pixels as f64);
}

/// Record the outcome of a grayscale filter pass
pub fn record_filter_metrics(success: bool) {
    metrics::counter!("grayscale_filter_total", "result" => if success { "success" } else { "failure" })
        .increment(1);
}

/// Record a recorder lifecycle event (started, stopped, encode_error)
pub fn record_recording_event(event: &'static str) {
    metrics::counter!("recordings_total", "event" => event).increment(1);
}

/// Record a hand-off attempt
pub fn record_hand_off(accepted: bool) {
    metrics::counter!("hand_offs_total", "result" => if accepted { "accepted" } else { "refused" })
        .increment(1);
}

/// Record error metrics
pub fn record_error_metrics(error_type: &str, component: &str) {
    let error_type = error_type.to_string();
    let component = component.to_string();
    metrics::counter!("errors_total", "type" => error_type, "component" => component).increment(1);
}
