//! Match score validation
//!
//! Rules a submitted result must satisfy before it is recorded. The rating
//! engine itself trusts its input; these checks run in the service layer.

use crate::config::ScoringConfig;
use crate::error::LeaderboardError;
use crate::types::NewMatch;

/// Checks submitted match results against the scoring rules
#[derive(Debug, Clone, Default)]
pub struct MatchValidator {
    scoring: ScoringConfig,
}

impl MatchValidator {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    /// Validate a submitted result
    pub fn validate(&self, submitted: &NewMatch) -> crate::error::Result<()> {
        if submitted.winner == submitted.loser {
            return Err(invalid("A player cannot play against themselves."));
        }

        if submitted.draw {
            return self.validate_draw(submitted);
        }

        let winning_score = submitted.winning_score;
        let losing_score = submitted.losing_score;
        let target = self.scoring.winning_score;
        let margin = self.scoring.min_margin;

        if winning_score == losing_score {
            return Err(invalid("Scores are level; record the match as a draw."));
        }
        if winning_score < target {
            return Err(invalid(&format!(
                "Winning score must be {} or greater.",
                target
            )));
        }
        if losing_score > winning_score || winning_score - losing_score < margin {
            return Err(invalid(&format!(
                "Losing score must be less than the winning score by at least {} points.",
                margin
            )));
        }
        if winning_score > target && winning_score - losing_score != margin {
            return Err(invalid(&format!(
                "Deuce game! Winner must win by exactly {} points when above {}.",
                margin, target
            )));
        }

        Ok(())
    }

    fn validate_draw(&self, submitted: &NewMatch) -> crate::error::Result<()> {
        if submitted.winning_score != submitted.losing_score {
            return Err(invalid("A drawn match must have equal scores."));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> anyhow::Error {
    LeaderboardError::InvalidMatch {
        reason: reason.to_string(),
    }
    .into()
}
