//! # Observability Configuration
//!
//! Environment-specific settings for logging and metrics.

use serde::{Deserialize, Serialize};
use std::env;

/// Supported log output formats
pub const LOG_FORMATS: &[&str] = &["json", "pretty"];

/// Supported log levels
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Observability configuration for different environments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Log level for this crate's targets
    pub log_level: String,
    /// Log output format; `None` picks pretty in development and JSON elsewhere
    pub log_format: Option<String>,
    /// Whether to install the metrics recorder
    pub enable_metrics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: None,
            enable_metrics: true,
        }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").ok(),
            enable_metrics: env::var("ENABLE_METRICS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        }
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Whether log lines should be human-readable rather than JSON
    pub fn use_pretty_logs(&self) -> bool {
        match self.log_format.as_deref() {
            Some(format) => format == "pretty",
            None => self.is_development(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!("Invalid log level: {}", self.log_level));
        }

        if let Some(format) = &self.log_format {
            if !LOG_FORMATS.contains(&format.as_str()) {
                return Err(format!("Invalid log format: {}", format));
            }
        }

        if self.environment.trim().is_empty() {
            return Err("Environment name cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid_development() {
        let config = ObservabilityConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_development());
        assert!(!config.is_production());
        assert!(config.use_pretty_logs());
    }

    #[test]
    fn test_explicit_format_wins() {
        let config = ObservabilityConfig {
            environment: "production".to_string(),
            log_format: Some("pretty".to_string()),
            ..Default::default()
        };
        assert!(config.use_pretty_logs());

        let config = ObservabilityConfig {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(!config.use_pretty_logs());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ObservabilityConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.log_level = "debug".to_string();
        config.log_format = Some("xml".to_string());
        assert!(config.validate().is_err());

        config.log_format = Some("json".to_string());
        assert!(config.validate().is_ok());
    }
}
