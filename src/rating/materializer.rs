//! Rating materialization
//!
//! Decides, per match event, whether the ratings table is rebuilt from the
//! whole history or patched with a single new match, and publishes the
//! result through a [`RatingWriter`].

use crate::error::LeaderboardError;
use crate::rating::accumulator::RatingAccumulator;
use crate::rating::elo::EloCalculator;
use crate::rating::storage::{MatchHistory, RatingReader, RatingWriter};
use crate::types::{
    Match, MatchEvent, MatchId, Player, PlayerId, RatingRecord, RatingUpdate, RatingValue,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What a materialization pass did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Materialization {
    /// Every rating record was regenerated from history
    FullRecompute { records: Vec<RatingRecord> },
    /// Only the two participants of one new match were updated
    Incremental {
        match_id: MatchId,
        update: RatingUpdate,
    },
}

/// True when `matches` is ascending by timestamp, insertion order breaking ties
pub fn is_chronological(matches: &[Match]) -> bool {
    matches
        .windows(2)
        .all(|pair| pair[0].chronological_key() <= pair[1].chronological_key())
}

/// Fold `matches` in the given order through a fresh accumulator
///
/// Callers must pass the history in chronological order; ratings are a
/// left-to-right fold, so any other order yields different (wrong) ratings.
pub fn replay_history(
    calculator: &EloCalculator,
    players: &HashMap<PlayerId, Player>,
    matches: &[Match],
) -> crate::error::Result<RatingAccumulator> {
    debug_assert!(
        is_chronological(matches),
        "match history must be replayed in chronological order"
    );
    if !is_chronological(matches) {
        warn!("Replaying match history that is not in chronological order");
    }

    let mut accumulator = RatingAccumulator::new(calculator.clone());
    for game in matches {
        let winner = players
            .get(&game.winner)
            .ok_or(LeaderboardError::PlayerNotFound {
                player_id: game.winner,
            })?;
        let loser = players
            .get(&game.loser)
            .ok_or(LeaderboardError::PlayerNotFound {
                player_id: game.loser,
            })?;
        accumulator.update_ratings(winner, loser, game.draw);
    }

    Ok(accumulator)
}

/// Event-driven rating policy
#[derive(Debug, Clone, Default)]
pub struct RatingMaterializer {
    calculator: EloCalculator,
}

impl RatingMaterializer {
    pub fn new(calculator: EloCalculator) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &EloCalculator {
        &self.calculator
    }

    /// React to a change in persisted history
    pub fn handle_event<H, W>(
        &self,
        history: &H,
        writer: &W,
        event: &MatchEvent,
    ) -> crate::error::Result<Materialization>
    where
        H: MatchHistory + RatingReader + ?Sized,
        W: RatingWriter + ?Sized,
    {
        debug!(%event, "materializing ratings");

        match *event {
            MatchEvent::Created { match_id } => {
                let created = history
                    .get_match(match_id)?
                    .ok_or(LeaderboardError::MatchNotFound { match_id })?;

                let is_latest = history.latest_match_key()? == Some(created.chronological_key());
                if is_latest {
                    let update = self.add_ratings(history, writer, &created)?;
                    Ok(Materialization::Incremental { match_id, update })
                } else {
                    info!(
                        match_id,
                        "New match predates existing history, recomputing all ratings"
                    );
                    let records = self.generate_ratings(history, writer)?;
                    Ok(Materialization::FullRecompute { records })
                }
            }
            MatchEvent::Updated { match_id } => {
                info!(match_id, "Match edited, recomputing all ratings");
                let records = self.generate_ratings(history, writer)?;
                Ok(Materialization::FullRecompute { records })
            }
            MatchEvent::PlayerRatingEdited { player_id, rating } => {
                info!(player_id, rating, "Player seed edited, recomputing all ratings");
                let records = self.generate_ratings(history, writer)?;
                Ok(Materialization::FullRecompute { records })
            }
        }
    }

    /// Wipe and regenerate every rating record from the full history
    ///
    /// Idempotent: the result depends only on the history and player seeds.
    /// Every player's own rating is brought in line with the regenerated
    /// table, including players left with no record.
    pub fn generate_ratings<H, W>(
        &self,
        history: &H,
        writer: &W,
    ) -> crate::error::Result<Vec<RatingRecord>>
    where
        H: MatchHistory + ?Sized,
        W: RatingWriter + ?Sized,
    {
        let matches = history.matches_in_order()?;
        let players = history.players()?;

        let records = replay_history(&self.calculator, &players, &matches)?.into_records();

        writer.replace_ratings(records.clone())?;

        // Players without a record fall back to their seed
        let rated: HashMap<PlayerId, RatingValue> = records
            .iter()
            .map(|record| (record.player_id, record.rating))
            .collect();
        for player in players.values() {
            let rating = rated
                .get(&player.id)
                .copied()
                .unwrap_or_else(|| player.seed_rating(self.calculator.default_rating()));
            if player.rating != rating {
                writer.set_player_rating(player.id, rating)?;
            }
        }

        info!(
            matches = matches.len(),
            players = records.len(),
            "Regenerated ratings from full history"
        );
        Ok(records)
    }

    /// Fold one newly appended match into the persisted ratings
    pub fn add_ratings<H, W>(
        &self,
        history: &H,
        writer: &W,
        new_match: &Match,
    ) -> crate::error::Result<RatingUpdate>
    where
        H: MatchHistory + RatingReader + ?Sized,
        W: RatingWriter + ?Sized,
    {
        let winner = require_player(history, new_match.winner)?;
        let loser = require_player(history, new_match.loser)?;

        let mut accumulator =
            RatingAccumulator::seeded(self.calculator.clone(), history.current_ratings()?);
        let update = accumulator.update_ratings(&winner, &loser, new_match.draw);

        writer.upsert_ratings(vec![
            RatingRecord {
                player_id: winner.id,
                rating: update.new_winner_rating,
            },
            RatingRecord {
                player_id: loser.id,
                rating: update.new_loser_rating,
            },
        ])?;
        writer.set_player_rating(winner.id, update.new_winner_rating)?;
        writer.set_player_rating(loser.id, update.new_loser_rating)?;

        info!(
            match_id = new_match.id,
            winner = %winner,
            loser = %loser,
            winner_delta = update.winner_delta,
            loser_delta = update.loser_delta,
            "Applied new match to ratings"
        );
        Ok(update)
    }
}

fn require_player<H>(history: &H, player_id: PlayerId) -> crate::error::Result<Player>
where
    H: MatchHistory + ?Sized,
{
    history
        .get_player(player_id)?
        .ok_or_else(|| LeaderboardError::PlayerNotFound { player_id }.into())
}
