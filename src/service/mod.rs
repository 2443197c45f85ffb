//! Service layer for the ladder
//!
//! This module contains the leaderboard facade that records players and
//! matches, emits match events and keeps the ratings table current.

pub mod leaderboard;

pub use leaderboard::{Leaderboard, Standing};
