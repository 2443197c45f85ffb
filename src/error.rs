//! Error types for the ladder
//!
//! Fallible operations return `anyhow::Result`; the named failure cases a
//! caller may want to match on are carried by [`LeaderboardError`].

use crate::types::{MatchId, PlayerId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ladder scenarios
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: PlayerId },

    #[error("Player not found by name: {name}")]
    UnknownPlayerName { name: String },

    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: MatchId },

    #[error("Player already exists: {first_name} {last_name}")]
    DuplicatePlayer {
        first_name: String,
        last_name: String,
    },

    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Invalid match history file: {message}")]
    InvalidHistory { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}
