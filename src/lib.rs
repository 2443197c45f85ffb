//! Paddle Ladder - Elo rankings for table-tennis match results
//!
//! This crate records players and match results, validates scores, and keeps
//! an Elo ratings table current by replaying or extending the match history.

pub mod config;
pub mod error;
pub mod history;
pub mod rating;
pub mod service;
pub mod stats;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used types and traits
pub use error::{LeaderboardError, Result};
pub use types::*;

// Re-export key components
pub use rating::{EloCalculator, InMemoryLeaderboardStore, RatingAccumulator, RatingMaterializer};
pub use service::{Leaderboard, Standing};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
