//! Elo rating engine
//!
//! This module provides the rating calculator, the per-pass accumulator,
//! the storage interfaces it reads and writes through, and the policy that
//! turns match events into rating updates.

pub mod accumulator;
pub mod elo;
pub mod materializer;
pub mod storage;

// Re-export commonly used types
pub use accumulator::RatingAccumulator;
pub use elo::{expected_score, EloCalculator};
pub use materializer::{replay_history, Materialization, RatingMaterializer};
pub use storage::{
    InMemoryLeaderboardStore, LeaderboardStore, MatchHistory, RatingReader, RatingWriter,
};
