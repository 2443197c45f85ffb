//! Elo rating calculator
//!
//! Pure functions turning a pair of ratings and a match outcome into new
//! ratings. The logistic update itself comes from the skillratings crate;
//! this module fixes the K-factor and rounds results to whole points.

use crate::config::RatingConfig;
use crate::types::{RatingUpdate, RatingValue};
use skillratings::elo::{elo, EloConfig, EloRating};
use skillratings::Outcomes;

/// Probability-of-win estimate for a player rated `rating` against `opponent_rating`
///
/// `1 / (1 + 10^((opponent_rating - rating) / 400))`
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    let (expected, _) = skillratings::elo::expected_score(
        &EloRating { rating },
        &EloRating {
            rating: opponent_rating,
        },
    );
    expected
}

/// Round half to even, like the ratings table always has
pub fn round_rating(value: f64) -> RatingValue {
    value.round_ties_even() as RatingValue
}

/// Fixed-K Elo calculator
#[derive(Debug, Clone)]
pub struct EloCalculator {
    config: RatingConfig,
}

impl EloCalculator {
    /// Create a new calculator
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    /// Rating for players with no history and no seed of their own
    pub fn default_rating(&self) -> RatingValue {
        self.config.default_rating
    }

    /// Maximum rating points exchanged in one match
    pub fn k_factor(&self) -> f64 {
        self.config.k_factor
    }

    /// Parameters this calculator was built with
    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Ratings after `winner` beat (or drew with) `loser`
    ///
    /// For a draw both sides are scored 0.5 and the labels carry no meaning:
    /// the lower-rated side gains whatever the higher-rated side loses.
    pub fn new_ratings(
        &self,
        winner_rating: RatingValue,
        loser_rating: RatingValue,
        draw: bool,
    ) -> RatingUpdate {
        let outcome = if draw { Outcomes::DRAW } else { Outcomes::WIN };
        let (winner, loser) = elo(
            &EloRating {
                rating: f64::from(winner_rating),
            },
            &EloRating {
                rating: f64::from(loser_rating),
            },
            &outcome,
            &EloConfig {
                k: self.config.k_factor,
            },
        );

        let new_winner_rating = round_rating(winner.rating);
        let new_loser_rating = round_rating(loser.rating);

        RatingUpdate {
            new_winner_rating,
            new_loser_rating,
            winner_delta: new_winner_rating - winner_rating,
            loser_delta: new_loser_rating - loser_rating,
        }
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
        }
    }
}
