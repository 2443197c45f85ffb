//! Match history files
//!
//! JSON documents listing players and match results, used to load a
//! leaderboard from disk. Players are referenced by full name.

use crate::error::LeaderboardError;
use crate::rating::LeaderboardStore;
use crate::service::Leaderboard;
use crate::types::{NewMatch, PlayerId, RatingValue};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// A player entry in a history file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub initial_rating: Option<RatingValue>,
}

/// A match entry in a history file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub winner: String,
    pub loser: String,
    pub winning_score: u32,
    pub losing_score: u32,
    pub played_at: DateTime<Utc>,
    #[serde(default)]
    pub draw: bool,
}

/// Players and matches as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFile {
    #[serde(default)]
    pub players: Vec<PlayerEntry>,
    #[serde(default)]
    pub matches: Vec<MatchEntry>,
}

impl HistoryFile {
    /// Read a history file from disk
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read history file {}", path.display()))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> crate::error::Result<Self> {
        serde_json::from_str(contents).map_err(|e| {
            LeaderboardError::InvalidHistory {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Register every player and record every match, in file order
    ///
    /// Seeds are applied before any match so that no recompute is needed.
    pub fn apply<S: LeaderboardStore>(&self, board: &Leaderboard<S>) -> crate::error::Result<()> {
        let mut ids: HashMap<String, PlayerId> = HashMap::new();

        for entry in &self.players {
            let player = board.add_player(&entry.first_name, &entry.last_name)?;
            if entry.initial_rating.is_some() {
                board
                    .store()
                    .set_player_seed(player.id, entry.initial_rating)?;
            }
            ids.insert(player.full_name(), player.id);
        }

        let lookup = |name: &str| -> crate::error::Result<PlayerId> {
            ids.get(name).copied().ok_or_else(|| {
                LeaderboardError::UnknownPlayerName {
                    name: name.to_string(),
                }
                .into()
            })
        };

        for (index, entry) in self.matches.iter().enumerate() {
            let submitted = NewMatch {
                winner: lookup(&entry.winner)?,
                loser: lookup(&entry.loser)?,
                winning_score: entry.winning_score,
                losing_score: entry.losing_score,
                played_at: Some(entry.played_at),
                draw: entry.draw,
            };
            board
                .record_match(submitted)
                .with_context(|| format!("Match #{} in history file was rejected", index + 1))?;
        }

        info!(
            players = self.players.len(),
            matches = self.matches.len(),
            "Loaded match history"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::rating::{InMemoryLeaderboardStore, RatingReader};

    const HISTORY: &str = r#"{
        "players": [
            {"first_name": "Bob", "last_name": "Hope"},
            {"first_name": "Sue", "last_name": "Hope", "initial_rating": 1500}
        ],
        "matches": [
            {"winner": "Bob Hope", "loser": "Sue Hope", "winning_score": 21,
             "losing_score": 15, "played_at": "2024-02-01T18:00:00Z"},
            {"winner": "Sue Hope", "loser": "Bob Hope", "winning_score": 20,
             "losing_score": 20, "played_at": "2024-02-02T18:00:00Z", "draw": true}
        ]
    }"#;

    fn board() -> Leaderboard<InMemoryLeaderboardStore> {
        Leaderboard::from_config(InMemoryLeaderboardStore::default(), &AppConfig::default())
            .unwrap()
    }

    #[test]
    fn test_parse_history() {
        let history = HistoryFile::from_json(HISTORY).unwrap();
        assert_eq!(history.players.len(), 2);
        assert_eq!(history.players[1].initial_rating, Some(1500));
        assert_eq!(history.matches.len(), 2);
        assert!(!history.matches[0].draw);
        assert!(history.matches[1].draw);
    }

    #[test]
    fn test_apply_history() {
        let board = board();
        HistoryFile::from_json(HISTORY).unwrap().apply(&board).unwrap();

        assert_eq!(board.recent_matches(10).unwrap().len(), 2);
        assert_eq!(board.store().current_ratings().unwrap().len(), 2);

        let standings = board.standings().unwrap();
        let total_games: u32 = standings.iter().map(|s| s.stats.games_played).sum();
        assert_eq!(total_games, 4);
    }

    #[test]
    fn test_unknown_player_rejected() {
        let history = HistoryFile::from_json(
            r#"{"players": [{"first_name": "Bob", "last_name": "Hope"}],
                "matches": [{"winner": "Bob Hope", "loser": "Nobody", "winning_score": 21,
                             "losing_score": 3, "played_at": "2024-02-01T18:00:00Z"}]}"#,
        )
        .unwrap();

        assert!(history.apply(&board()).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = HistoryFile::from_json("{ not json").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeaderboardError>(),
            Some(LeaderboardError::InvalidHistory { .. })
        ));
    }
}
