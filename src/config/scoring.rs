//! Scoring rules used to validate submitted matches

use serde::{Deserialize, Serialize};

/// Game-to-N scoring with a win-by margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points needed to win a game
    pub winning_score: u32,
    /// Minimum lead at the end of a game; exact lead once past `winning_score`
    pub min_margin: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            winning_score: 21,
            min_margin: 2,
        }
    }
}

impl ScoringConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.winning_score == 0 {
            return Err(crate::error::LeaderboardError::ConfigurationError {
                message: "Winning score must be greater than 0".to_string(),
            }
            .into());
        }

        if self.min_margin == 0 || self.min_margin > self.winning_score {
            return Err(crate::error::LeaderboardError::ConfigurationError {
                message: format!(
                    "Minimum margin must be between 1 and {}, got {}",
                    self.winning_score, self.min_margin
                ),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_config_validation() {
        assert!(ScoringConfig::default().validate().is_ok());

        let zero_target = ScoringConfig {
            winning_score: 0,
            min_margin: 2,
        };
        assert!(zero_target.validate().is_err());

        let zero_margin = ScoringConfig {
            winning_score: 11,
            min_margin: 0,
        };
        assert!(zero_margin.validate().is_err());

        let short_game = ScoringConfig {
            winning_score: 11,
            min_margin: 2,
        };
        assert!(short_game.validate().is_ok());
    }
}
