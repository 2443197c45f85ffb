//! Test fixtures for integration testing

#![allow(dead_code)]

use anyhow::anyhow;
use chrono::{DateTime, Duration, TimeZone, Utc};
use paddle_ladder::config::AppConfig;
use paddle_ladder::error::Result;
use paddle_ladder::rating::{
    InMemoryLeaderboardStore, LeaderboardStore, MatchHistory, RatingReader, RatingWriter,
};
use paddle_ladder::types::{
    Match, MatchId, NewMatch, Player, PlayerId, RatingRecord, RatingValue,
};
use paddle_ladder::Leaderboard;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory store that counts how the ratings table gets written
///
/// Full recomputes go through `replace_ratings`, single-match updates through
/// `upsert_ratings`, so the counters tell the two paths apart. Writes can be
/// made to fail once to exercise rollback.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: InMemoryLeaderboardStore,
    replace_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    fail_next_upsert: AtomicBool,
    fail_next_replace: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Make the next `upsert_ratings` call fail without writing anything
    pub fn fail_next_upsert(&self) {
        self.fail_next_upsert.store(true, Ordering::SeqCst);
    }

    /// Make the next `replace_ratings` call fail without writing anything
    pub fn fail_next_replace(&self) {
        self.fail_next_replace.store(true, Ordering::SeqCst);
    }

    pub fn reset_counts(&self) {
        self.replace_calls.store(0, Ordering::SeqCst);
        self.upsert_calls.store(0, Ordering::SeqCst);
    }
}

impl MatchHistory for RecordingStore {
    fn matches_in_order(&self) -> Result<Vec<Match>> {
        self.inner.matches_in_order()
    }

    fn get_match(&self, match_id: MatchId) -> Result<Option<Match>> {
        self.inner.get_match(match_id)
    }

    fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        self.inner.get_player(player_id)
    }

    fn players(&self) -> Result<HashMap<PlayerId, Player>> {
        self.inner.players()
    }

    fn latest_match_key(&self) -> Result<Option<(DateTime<Utc>, MatchId)>> {
        self.inner.latest_match_key()
    }
}

impl RatingReader for RecordingStore {
    fn current_ratings(&self) -> Result<HashMap<PlayerId, RatingValue>> {
        self.inner.current_ratings()
    }
}

impl RatingWriter for RecordingStore {
    fn replace_ratings(&self, records: Vec<RatingRecord>) -> Result<()> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_replace.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("ratings table unavailable"));
        }
        self.inner.replace_ratings(records)
    }

    fn upsert_ratings(&self, records: Vec<RatingRecord>) -> Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_upsert.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("ratings table unavailable"));
        }
        self.inner.upsert_ratings(records)
    }

    fn set_player_rating(&self, player_id: PlayerId, rating: RatingValue) -> Result<()> {
        self.inner.set_player_rating(player_id, rating)
    }

    fn set_player_seed(&self, player_id: PlayerId, seed: Option<RatingValue>) -> Result<()> {
        self.inner.set_player_seed(player_id, seed)
    }
}

impl LeaderboardStore for RecordingStore {
    fn add_player(&self, first_name: &str, last_name: &str) -> Result<Player> {
        self.inner.add_player(first_name, last_name)
    }

    fn insert_match(&self, new_match: NewMatch) -> Result<Match> {
        self.inner.insert_match(new_match)
    }

    fn update_match(&self, match_id: MatchId, edited: NewMatch) -> Result<Match> {
        self.inner.update_match(match_id, edited)
    }

    fn remove_match(&self, match_id: MatchId) -> Result<Option<Match>> {
        self.inner.remove_match(match_id)
    }

    fn recent_matches(&self, limit: usize) -> Result<Vec<Match>> {
        self.inner.recent_matches(limit)
    }

    fn rating_records(&self) -> Result<Vec<RatingRecord>> {
        self.inner.rating_records()
    }
}

/// Leaderboard with default configuration over a plain in-memory store
pub fn create_leaderboard() -> Leaderboard<InMemoryLeaderboardStore> {
    Leaderboard::from_config(InMemoryLeaderboardStore::default(), &AppConfig::default())
        .expect("default configuration is valid")
}

/// Leaderboard whose store records rating writes
pub fn create_recording_leaderboard() -> Leaderboard<RecordingStore> {
    Leaderboard::from_config(RecordingStore::new(), &AppConfig::default())
        .expect("default configuration is valid")
}

/// Register `names` ("First Last") and return them in the same order
pub fn register_players<S: LeaderboardStore>(
    board: &Leaderboard<S>,
    names: &[&str],
) -> Vec<Player> {
    names
        .iter()
        .map(|name| {
            let (first, last) = name.split_once(' ').unwrap_or((name, ""));
            board.add_player(first, last).expect("player registers")
        })
        .collect()
}

/// Evening of the `n`th day after the fixture epoch
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap() + Duration::days(n)
}

/// A 21-`losing_score` result played on `day(n)`
pub fn win_on(winner: &Player, loser: &Player, losing_score: u32, n: i64) -> NewMatch {
    NewMatch::decisive(winner.id, loser.id, 21, losing_score).at(day(n))
}

/// A drawn match at `score`-`score` played on `day(n)`
pub fn draw_on(first: &Player, second: &Player, score: u32, n: i64) -> NewMatch {
    let mut draw = NewMatch::decisive(first.id, second.id, score, score).at(day(n));
    draw.draw = true;
    draw
}

/// Ratings keyed by player, as held in the ratings table
pub fn ratings_of<S: LeaderboardStore>(board: &Leaderboard<S>) -> HashMap<PlayerId, RatingValue> {
    board.store().current_ratings().expect("ratings are readable")
}
