//! Storage interfaces for match history and rating records
//!
//! The rating engine only sees the store through [`MatchHistory`],
//! [`RatingReader`] and [`RatingWriter`]. [`InMemoryLeaderboardStore`]
//! implements all of them plus the player/match writes the service needs.

use crate::config::DEFAULT_INITIAL_RATING;
use crate::error::LeaderboardError;
use crate::types::{Match, MatchId, NewMatch, Player, PlayerId, RatingRecord, RatingValue};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Read access to recorded matches and players
pub trait MatchHistory: Send + Sync {
    /// Every match, ascending by timestamp then insertion order
    fn matches_in_order(&self) -> crate::error::Result<Vec<Match>>;

    /// A single match
    fn get_match(&self, match_id: MatchId) -> crate::error::Result<Option<Match>>;

    /// A single player
    fn get_player(&self, player_id: PlayerId) -> crate::error::Result<Option<Player>>;

    /// All registered players
    fn players(&self) -> crate::error::Result<HashMap<PlayerId, Player>>;

    /// Replay key of the chronologically last match, `None` with no matches
    fn latest_match_key(&self) -> crate::error::Result<Option<(DateTime<Utc>, MatchId)>> {
        Ok(self
            .matches_in_order()?
            .last()
            .map(Match::chronological_key))
    }
}

/// Read access to the persisted ratings table
pub trait RatingReader: Send + Sync {
    /// Player → persisted rating, for every player with a record
    fn current_ratings(&self) -> crate::error::Result<HashMap<PlayerId, RatingValue>>;
}

/// Write access to the persisted ratings table and player ratings
#[cfg_attr(test, mockall::automock)]
pub trait RatingWriter: Send + Sync {
    /// Delete every rating record and insert `records` in one step
    fn replace_ratings(&self, records: Vec<RatingRecord>) -> crate::error::Result<()>;

    /// Insert or overwrite the given records, leaving others untouched
    fn upsert_ratings(&self, records: Vec<RatingRecord>) -> crate::error::Result<()>;

    /// Write a rating back onto the player's own record
    fn set_player_rating(&self, player_id: PlayerId, rating: RatingValue)
        -> crate::error::Result<()>;

    /// Override the rating a player's history is replayed from
    fn set_player_seed(
        &self,
        player_id: PlayerId,
        rating: Option<RatingValue>,
    ) -> crate::error::Result<()>;
}

/// Everything the leaderboard service needs from persistence
pub trait LeaderboardStore: MatchHistory + RatingReader + RatingWriter {
    /// Register a player; the first/last name pair must be unique
    fn add_player(&self, first_name: &str, last_name: &str) -> crate::error::Result<Player>;

    /// Append a new match
    fn insert_match(&self, new_match: NewMatch) -> crate::error::Result<Match>;

    /// Overwrite a stored match, keeping its id
    fn update_match(&self, match_id: MatchId, edited: NewMatch) -> crate::error::Result<Match>;

    /// Delete a stored match, returning it if it existed
    fn remove_match(&self, match_id: MatchId) -> crate::error::Result<Option<Match>>;

    /// Up to `limit` matches, most recent first
    fn recent_matches(&self, limit: usize) -> crate::error::Result<Vec<Match>>;

    /// The persisted ratings table, ordered by player id
    fn rating_records(&self) -> crate::error::Result<Vec<RatingRecord>>;
}

#[derive(Debug, Default)]
struct StoreState {
    players: BTreeMap<PlayerId, Player>,
    matches: BTreeMap<MatchId, Match>,
    // Replay order index over `matches`
    chronology: BTreeSet<(DateTime<Utc>, MatchId)>,
    ratings: HashMap<PlayerId, RatingValue>,
    next_player_id: PlayerId,
    next_match_id: MatchId,
}

impl StoreState {
    fn require_player(&self, player_id: PlayerId) -> crate::error::Result<()> {
        if self.players.contains_key(&player_id) {
            Ok(())
        } else {
            Err(LeaderboardError::PlayerNotFound { player_id }.into())
        }
    }
}

/// In-memory leaderboard storage
#[derive(Debug)]
pub struct InMemoryLeaderboardStore {
    state: RwLock<StoreState>,
    default_rating: RatingValue,
}

impl InMemoryLeaderboardStore {
    /// Create an empty store; new players start at `default_rating`
    pub fn new(default_rating: RatingValue) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            default_rating,
        }
    }

    /// Look a player up by full name ("First Last")
    pub fn find_player_by_name(&self, full_name: &str) -> crate::error::Result<Option<Player>> {
        let state = self.read()?;
        Ok(state
            .players
            .values()
            .find(|player| player.full_name() == full_name)
            .cloned())
    }

    pub fn player_count(&self) -> crate::error::Result<usize> {
        Ok(self.read()?.players.len())
    }

    pub fn match_count(&self) -> crate::error::Result<usize> {
        Ok(self.read()?.matches.len())
    }

    fn read(&self) -> crate::error::Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| {
                LeaderboardError::InternalError {
                    message: "Failed to acquire store read lock".to_string(),
                }
                .into()
            })
    }

    fn write(&self) -> crate::error::Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| {
                LeaderboardError::InternalError {
                    message: "Failed to acquire store write lock".to_string(),
                }
                .into()
            })
    }
}

impl Default for InMemoryLeaderboardStore {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_RATING)
    }
}

impl MatchHistory for InMemoryLeaderboardStore {
    fn matches_in_order(&self) -> crate::error::Result<Vec<Match>> {
        let state = self.read()?;
        Ok(state
            .chronology
            .iter()
            .filter_map(|(_, match_id)| state.matches.get(match_id).cloned())
            .collect())
    }

    fn latest_match_key(&self) -> crate::error::Result<Option<(DateTime<Utc>, MatchId)>> {
        Ok(self.read()?.chronology.last().copied())
    }

    fn get_match(&self, match_id: MatchId) -> crate::error::Result<Option<Match>> {
        Ok(self.read()?.matches.get(&match_id).cloned())
    }

    fn get_player(&self, player_id: PlayerId) -> crate::error::Result<Option<Player>> {
        Ok(self.read()?.players.get(&player_id).cloned())
    }

    fn players(&self) -> crate::error::Result<HashMap<PlayerId, Player>> {
        let state = self.read()?;
        Ok(state
            .players
            .iter()
            .map(|(id, player)| (*id, player.clone()))
            .collect())
    }
}

impl RatingReader for InMemoryLeaderboardStore {
    fn current_ratings(&self) -> crate::error::Result<HashMap<PlayerId, RatingValue>> {
        Ok(self.read()?.ratings.clone())
    }
}

impl RatingWriter for InMemoryLeaderboardStore {
    fn replace_ratings(&self, records: Vec<RatingRecord>) -> crate::error::Result<()> {
        let mut state = self.write()?;
        state.ratings.clear();
        for record in records {
            state.ratings.insert(record.player_id, record.rating);
        }
        Ok(())
    }

    fn upsert_ratings(&self, records: Vec<RatingRecord>) -> crate::error::Result<()> {
        let mut state = self.write()?;
        for record in records {
            state.ratings.insert(record.player_id, record.rating);
        }
        Ok(())
    }

    fn set_player_rating(
        &self,
        player_id: PlayerId,
        rating: RatingValue,
    ) -> crate::error::Result<()> {
        let mut state = self.write()?;
        let player = state
            .players
            .get_mut(&player_id)
            .ok_or(LeaderboardError::PlayerNotFound { player_id })?;
        player.rating = rating;
        Ok(())
    }

    fn set_player_seed(
        &self,
        player_id: PlayerId,
        rating: Option<RatingValue>,
    ) -> crate::error::Result<()> {
        let mut state = self.write()?;
        let player = state
            .players
            .get_mut(&player_id)
            .ok_or(LeaderboardError::PlayerNotFound { player_id })?;
        player.initial_rating = rating;
        Ok(())
    }
}

impl LeaderboardStore for InMemoryLeaderboardStore {
    fn add_player(&self, first_name: &str, last_name: &str) -> crate::error::Result<Player> {
        let mut state = self.write()?;

        let duplicate = state
            .players
            .values()
            .any(|player| player.first_name == first_name && player.last_name == last_name);
        if duplicate {
            return Err(LeaderboardError::DuplicatePlayer {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            }
            .into());
        }

        state.next_player_id += 1;
        let player = Player {
            id: state.next_player_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            rating: self.default_rating,
            initial_rating: None,
        };
        state.players.insert(player.id, player.clone());
        Ok(player)
    }

    fn insert_match(&self, new_match: NewMatch) -> crate::error::Result<Match> {
        let mut state = self.write()?;
        state.require_player(new_match.winner)?;
        state.require_player(new_match.loser)?;

        state.next_match_id += 1;
        let stored = Match {
            id: state.next_match_id,
            winner: new_match.winner,
            loser: new_match.loser,
            winning_score: new_match.winning_score,
            losing_score: new_match.losing_score,
            played_at: new_match.played_at.unwrap_or_else(Utc::now),
            draw: new_match.draw,
        };
        state.chronology.insert(stored.chronological_key());
        state.matches.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update_match(&self, match_id: MatchId, edited: NewMatch) -> crate::error::Result<Match> {
        let mut state = self.write()?;
        state.require_player(edited.winner)?;
        state.require_player(edited.loser)?;

        let state = &mut *state;
        let stored = state
            .matches
            .get_mut(&match_id)
            .ok_or(LeaderboardError::MatchNotFound { match_id })?;
        state.chronology.remove(&stored.chronological_key());
        stored.winner = edited.winner;
        stored.loser = edited.loser;
        stored.winning_score = edited.winning_score;
        stored.losing_score = edited.losing_score;
        stored.draw = edited.draw;
        if let Some(played_at) = edited.played_at {
            stored.played_at = played_at;
        }
        state.chronology.insert(stored.chronological_key());
        Ok(stored.clone())
    }

    fn remove_match(&self, match_id: MatchId) -> crate::error::Result<Option<Match>> {
        let mut state = self.write()?;
        let removed = state.matches.remove(&match_id);
        if let Some(game) = &removed {
            state.chronology.remove(&game.chronological_key());
        }
        Ok(removed)
    }

    fn recent_matches(&self, limit: usize) -> crate::error::Result<Vec<Match>> {
        let mut matches = self.matches_in_order()?;
        matches.reverse();
        matches.truncate(limit);
        Ok(matches)
    }

    fn rating_records(&self) -> crate::error::Result<Vec<RatingRecord>> {
        let state = self.read()?;
        let mut records: Vec<RatingRecord> = state
            .ratings
            .iter()
            .map(|(player_id, rating)| RatingRecord {
                player_id: *player_id,
                rating: *rating,
            })
            .collect();
        records.sort_by_key(|record| record.player_id);
        Ok(records)
    }
}
