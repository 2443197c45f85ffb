//! Rating accumulator
//!
//! Holds the running rating of every player touched during one
//! materialization pass and folds match outcomes through the calculator.
//! A fresh accumulator is built for each pass and dropped afterwards.

use crate::rating::elo::EloCalculator;
use crate::types::{Player, PlayerId, RatingRecord, RatingUpdate, RatingValue};
use std::collections::HashMap;
use tracing::trace;

/// Player → current rating for a single replay
#[derive(Debug, Clone)]
pub struct RatingAccumulator {
    calculator: EloCalculator,
    ratings: HashMap<PlayerId, RatingValue>,
}

impl RatingAccumulator {
    /// Create an empty accumulator
    pub fn new(calculator: EloCalculator) -> Self {
        Self {
            calculator,
            ratings: HashMap::new(),
        }
    }

    /// Create an accumulator seeded with externally persisted ratings
    pub fn seeded<I>(calculator: EloCalculator, current_ratings: I) -> Self
    where
        I: IntoIterator<Item = (PlayerId, RatingValue)>,
    {
        let mut accumulator = Self::new(calculator);
        for (player_id, rating) in current_ratings {
            accumulator.set_rating(player_id, rating);
        }
        accumulator
    }

    /// Tracked rating, else the player's own seed, else the configured default
    ///
    /// Never inserts into the mapping.
    pub fn get_rating(&self, player: &Player) -> RatingValue {
        self.ratings
            .get(&player.id)
            .copied()
            .unwrap_or_else(|| player.seed_rating(self.calculator.default_rating()))
    }

    /// Force a player's tracked rating
    pub fn set_rating(&mut self, player_id: PlayerId, rating: RatingValue) {
        self.ratings.insert(player_id, rating);
    }

    /// Expected score of `player` against `opponent` at their current ratings
    pub fn expected_score(&self, player: &Player, opponent: &Player) -> f64 {
        crate::rating::elo::expected_score(
            f64::from(self.get_rating(player)),
            f64::from(self.get_rating(opponent)),
        )
    }

    /// Apply one match outcome and return the calculator's result unchanged
    pub fn update_ratings(&mut self, winner: &Player, loser: &Player, draw: bool) -> RatingUpdate {
        let winner_rating = self.get_rating(winner);
        let loser_rating = self.get_rating(loser);

        let update = self
            .calculator
            .new_ratings(winner_rating, loser_rating, draw);

        self.ratings.insert(winner.id, update.new_winner_rating);
        self.ratings.insert(loser.id, update.new_loser_rating);

        trace!(
            winner = winner.id,
            loser = loser.id,
            draw,
            winner_delta = update.winner_delta,
            loser_delta = update.loser_delta,
            "applied match to accumulator"
        );

        update
    }

    /// Tracked rating without the fallback chain
    pub fn tracked_rating(&self, player_id: PlayerId) -> Option<RatingValue> {
        self.ratings.get(&player_id).copied()
    }

    pub fn ratings(&self) -> &HashMap<PlayerId, RatingValue> {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Consume the accumulator into rating records, ordered by player id
    pub fn into_records(self) -> Vec<RatingRecord> {
        let mut records: Vec<RatingRecord> = self
            .ratings
            .into_iter()
            .map(|(player_id, rating)| RatingRecord { player_id, rating })
            .collect();
        records.sort_by_key(|record| record.player_id);
        records
    }
}

impl Default for RatingAccumulator {
    fn default() -> Self {
        Self::new(EloCalculator::default())
    }
}
