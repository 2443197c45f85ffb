//! Main application configuration
//!
//! This module defines the top-level configuration for the ladder, including
//! environment variable loading, TOML files and validation.

use crate::config::{RatingConfig, ScoringConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub scoring: ScoringConfig,
    pub display: DisplaySettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Output settings for the command-line tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Number of matches listed by `recent` when no limit is given
    pub recent_matches: usize,
    /// Decimal places used for win percentages
    pub percentage_decimals: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "paddle-ladder".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            recent_matches: 10,
            percentage_decimals: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML; missing sections take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(rating) = env::var("DEFAULT_RATING") {
            self.rating.default_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid DEFAULT_RATING value: {}", rating))?;
        }
        if let Ok(k_factor) = env::var("K_FACTOR") {
            self.rating.k_factor = k_factor
                .parse()
                .map_err(|_| anyhow!("Invalid K_FACTOR value: {}", k_factor))?;
        }

        // Scoring settings
        if let Ok(score) = env::var("WINNING_SCORE") {
            self.scoring.winning_score = score
                .parse()
                .map_err(|_| anyhow!("Invalid WINNING_SCORE value: {}", score))?;
        }
        if let Ok(margin) = env::var("MIN_MARGIN") {
            self.scoring.min_margin = margin
                .parse()
                .map_err(|_| anyhow!("Invalid MIN_MARGIN value: {}", margin))?;
        }

        // Display settings
        if let Ok(recent) = env::var("RECENT_MATCHES") {
            self.display.recent_matches = recent
                .parse()
                .map_err(|_| anyhow!("Invalid RECENT_MATCHES value: {}", recent))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;
    config.scoring.validate()?;

    if config.display.recent_matches == 0 {
        return Err(anyhow!("Recent match count must be greater than 0"));
    }

    Ok(())
}
