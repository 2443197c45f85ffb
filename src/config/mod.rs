//! Configuration management for the ladder
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values.

pub mod app;
pub mod rating;
pub mod scoring;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, DisplaySettings, ServiceSettings};
pub use rating::{RatingConfig, DEFAULT_INITIAL_RATING, DEFAULT_K_FACTOR};
pub use scoring::ScoringConfig;
