//! Common types used throughout the ladder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier for players
pub type PlayerId = u64;

/// Store-assigned identifier for matches, increasing in insertion order
pub type MatchId = u64;

/// Persisted ratings are whole numbers
pub type RatingValue = i32;

/// A registered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    /// Rating as of the player's own last direct update
    pub rating: RatingValue,
    /// Seed used when history is replayed; `None` means the configured default
    pub initial_rating: Option<RatingValue>,
}

impl Player {
    /// The player's full name, first plus last name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Rating this player starts from before any match is replayed
    pub fn seed_rating(&self, default_rating: RatingValue) -> RatingValue {
        self.initial_rating.unwrap_or(default_rating)
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// A recorded match result
///
/// For a draw the winner and loser labels are arbitrary; `winning_score`
/// equals `losing_score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub winning_score: u32,
    pub losing_score: u32,
    pub played_at: DateTime<Utc>,
    #[serde(default)]
    pub draw: bool,
}

impl Match {
    /// Hyphenated version of the match score, i.e. `21-19`
    pub fn score(&self) -> String {
        format!("{}-{}", self.winning_score, self.losing_score)
    }

    /// Short summary, e.g. `05/23/2018: Bob Hope defeated Sue Hope 21-19`
    pub fn description(&self, winner: &Player, loser: &Player) -> String {
        let verb = if self.draw { "drew with" } else { "defeated" };
        format!(
            "{}: {} {} {} {}",
            self.played_at.format("%m/%d/%Y"),
            winner,
            verb,
            loser,
            self.score()
        )
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.winner == player_id || self.loser == player_id
    }

    /// Replay order: timestamp first, insertion order breaks ties
    pub fn chronological_key(&self) -> (DateTime<Utc>, MatchId) {
        (self.played_at, self.id)
    }
}

/// Match data submitted for recording or editing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatch {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub winning_score: u32,
    pub losing_score: u32,
    /// Defaults to the time of recording
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub draw: bool,
}

impl NewMatch {
    /// A decisive result played now
    pub fn decisive(winner: PlayerId, loser: PlayerId, winning_score: u32, losing_score: u32) -> Self {
        Self {
            winner,
            loser,
            winning_score,
            losing_score,
            played_at: None,
            draw: false,
        }
    }

    pub fn at(mut self, played_at: DateTime<Utc>) -> Self {
        self.played_at = Some(played_at);
        self
    }
}

impl From<&Match> for NewMatch {
    fn from(game: &Match) -> Self {
        Self {
            winner: game.winner,
            loser: game.loser,
            winning_score: game.winning_score,
            losing_score: game.losing_score,
            played_at: Some(game.played_at),
            draw: game.draw,
        }
    }
}

/// One row of the derived ratings table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub player_id: PlayerId,
    pub rating: RatingValue,
}

/// Outcome of rating a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub new_winner_rating: RatingValue,
    pub new_loser_rating: RatingValue,
    pub winner_delta: RatingValue,
    pub loser_delta: RatingValue,
}

/// Notification emitted by the service whenever persisted history changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    /// A brand-new match was appended
    Created { match_id: MatchId },
    /// A previously stored match was edited
    Updated { match_id: MatchId },
    /// A player's seed rating was overridden
    PlayerRatingEdited {
        player_id: PlayerId,
        rating: RatingValue,
    },
}

impl std::fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchEvent::Created { match_id } => write!(f, "MatchCreated({})", match_id),
            MatchEvent::Updated { match_id } => write!(f, "MatchUpdated({})", match_id),
            MatchEvent::PlayerRatingEdited { player_id, rating } => {
                write!(f, "PlayerRatingEdited({}, {})", player_id, rating)
            }
        }
    }
}
