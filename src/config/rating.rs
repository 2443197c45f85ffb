//! Rating system configuration

use crate::types::RatingValue;
use serde::{Deserialize, Serialize};

/// Rating every player starts from
pub const DEFAULT_INITIAL_RATING: RatingValue = 1450;

/// Maximum rating points exchanged per match
pub const DEFAULT_K_FACTOR: f64 = 30.0;

/// Elo parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub default_rating: RatingValue,
    pub k_factor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_rating: DEFAULT_INITIAL_RATING,
            k_factor: DEFAULT_K_FACTOR,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(crate::error::LeaderboardError::ConfigurationError {
                message: format!("K-factor must be a positive number, got {}", self.k_factor),
            }
            .into());
        }

        if self.default_rating <= 0 {
            return Err(crate::error::LeaderboardError::ConfigurationError {
                message: format!(
                    "Default rating must be positive, got {}",
                    self.default_rating
                ),
            }
            .into());
        }

        Ok(())
    }
}
