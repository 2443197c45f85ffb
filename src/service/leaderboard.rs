//! Leaderboard service
//!
//! Coordinates the store, the match validator and the rating materializer.
//! Every write that changes history is turned into a [`MatchEvent`] and the
//! materializer decides how the ratings table catches up.

use crate::config::AppConfig;
use crate::error::LeaderboardError;
use crate::rating::{EloCalculator, LeaderboardStore, Materialization, RatingMaterializer};
use crate::stats::PlayerStats;
use crate::types::{Match, MatchEvent, MatchId, NewMatch, Player, PlayerId, RatingValue};
use crate::validation::MatchValidator;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// One row of the ranked table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub player: Player,
    pub rating: RatingValue,
    pub stats: PlayerStats,
}

/// Match recording and ranking on top of a store
pub struct Leaderboard<S> {
    store: S,
    materializer: RatingMaterializer,
    validator: MatchValidator,
    // Held for the whole write + materialization of one event
    write_lock: Mutex<()>,
}

impl<S: LeaderboardStore> Leaderboard<S> {
    pub fn new(store: S, materializer: RatingMaterializer, validator: MatchValidator) -> Self {
        Self {
            store,
            materializer,
            validator,
            write_lock: Mutex::new(()),
        }
    }

    /// Build a leaderboard from application configuration
    pub fn from_config(store: S, config: &AppConfig) -> crate::error::Result<Self> {
        let calculator = EloCalculator::new(config.rating)?;
        Ok(Self::new(
            store,
            RatingMaterializer::new(calculator),
            MatchValidator::new(config.scoring),
        ))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new player
    pub fn add_player(&self, first_name: &str, last_name: &str) -> crate::error::Result<Player> {
        let player = self.store.add_player(first_name, last_name)?;
        debug!(player_id = player.id, name = %player, "Registered player");
        Ok(player)
    }

    /// Validate, store and rate a brand-new match
    ///
    /// If the ratings cannot be updated the match is removed again, so the
    /// stored history never holds a match the ratings have not seen.
    pub fn record_match(&self, submitted: NewMatch) -> crate::error::Result<Match> {
        self.validator.validate(&submitted)?;

        let _guard = self.lock()?;
        let stored = self.store.insert_match(submitted)?;
        let event = MatchEvent::Created {
            match_id: stored.id,
        };
        if let Err(err) = self.dispatch(event) {
            warn!(%event, error = %err, "Rating update failed, removing match");
            self.store.remove_match(stored.id)?;
            self.restore_ratings();
            return Err(err);
        }
        Ok(stored)
    }

    /// Validate and store an edit to an existing match, then recompute all ratings
    ///
    /// The previous version of the match is restored if the recompute fails.
    pub fn edit_match(&self, match_id: MatchId, edited: NewMatch) -> crate::error::Result<Match> {
        self.validator.validate(&edited)?;

        let _guard = self.lock()?;
        let previous = self
            .store
            .get_match(match_id)?
            .ok_or(LeaderboardError::MatchNotFound { match_id })?;
        let stored = self.store.update_match(match_id, edited)?;
        let event = MatchEvent::Updated { match_id };
        if let Err(err) = self.dispatch(event) {
            warn!(%event, error = %err, "Rating recompute failed, restoring match");
            self.store.update_match(match_id, NewMatch::from(&previous))?;
            self.restore_ratings();
            return Err(err);
        }
        Ok(stored)
    }

    /// Override the rating a player's history is replayed from
    pub fn edit_player_rating(
        &self,
        player_id: PlayerId,
        rating: RatingValue,
    ) -> crate::error::Result<()> {
        let _guard = self.lock()?;
        let previous = self
            .store
            .get_player(player_id)?
            .ok_or(LeaderboardError::PlayerNotFound { player_id })?
            .initial_rating;
        self.store.set_player_seed(player_id, Some(rating))?;
        let event = MatchEvent::PlayerRatingEdited { player_id, rating };
        if let Err(err) = self.dispatch(event) {
            warn!(%event, error = %err, "Rating recompute failed, restoring seed");
            self.store.set_player_seed(player_id, previous)?;
            self.restore_ratings();
            return Err(err);
        }
        Ok(())
    }

    /// Regenerate the whole ratings table from history
    pub fn recompute(&self) -> crate::error::Result<()> {
        let _guard = self.lock()?;
        self.materializer
            .generate_ratings(&self.store, &self.store)?;
        Ok(())
    }

    /// Rated players, highest rating first
    pub fn standings(&self) -> crate::error::Result<Vec<Standing>> {
        let records = self.store.rating_records()?;
        let players = self.store.players()?;
        let matches = self.store.matches_in_order()?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let player = players
                .get(&record.player_id)
                .cloned()
                .ok_or(LeaderboardError::PlayerNotFound {
                    player_id: record.player_id,
                })?;
            rows.push(Standing {
                rank: 0,
                stats: PlayerStats::from_matches(player.id, &matches),
                player,
                rating: record.rating,
            });
        }

        rows.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then_with(|| a.player.full_name().cmp(&b.player.full_name()))
        });
        for (index, row) in rows.iter_mut().enumerate() {
            row.rank = index + 1;
        }

        Ok(rows)
    }

    /// Up to `limit` matches, most recent first
    pub fn recent_matches(&self, limit: usize) -> crate::error::Result<Vec<Match>> {
        self.store.recent_matches(limit)
    }

    /// Statistics for one player across the whole history
    pub fn player_stats(&self, player_id: PlayerId) -> crate::error::Result<PlayerStats> {
        if self.store.get_player(player_id)?.is_none() {
            return Err(LeaderboardError::PlayerNotFound { player_id }.into());
        }
        let matches = self.store.matches_in_order()?;
        Ok(PlayerStats::from_matches(player_id, &matches))
    }

    /// Human-readable summary of a stored match
    pub fn describe(&self, game: &Match) -> crate::error::Result<String> {
        let winner = self
            .store
            .get_player(game.winner)?
            .ok_or(LeaderboardError::PlayerNotFound {
                player_id: game.winner,
            })?;
        let loser = self
            .store
            .get_player(game.loser)?
            .ok_or(LeaderboardError::PlayerNotFound {
                player_id: game.loser,
            })?;
        Ok(game.description(&winner, &loser))
    }

    fn dispatch(&self, event: MatchEvent) -> crate::error::Result<Materialization> {
        let outcome = self
            .materializer
            .handle_event(&self.store, &self.store, &event)?;

        match &outcome {
            Materialization::FullRecompute { records } => {
                info!(%event, players = records.len(), "Ratings recomputed");
            }
            Materialization::Incremental { update, .. } => {
                info!(
                    %event,
                    winner_delta = update.winner_delta,
                    loser_delta = update.loser_delta,
                    "Ratings updated"
                );
            }
        }

        Ok(outcome)
    }

    // Best effort after a rollback: the failure being reported is the original one
    fn restore_ratings(&self) {
        if let Err(err) = self.materializer.generate_ratings(&self.store, &self.store) {
            error!(error = %err, "Failed to regenerate ratings after rollback");
        }
    }

    fn lock(&self) -> crate::error::Result<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| {
            LeaderboardError::InternalError {
                message: "Failed to acquire leaderboard write lock".to_string(),
            }
            .into()
        })
    }
}
