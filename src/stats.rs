//! Player statistics
//!
//! Aggregates derived from the match history for a single player.

use crate::types::{Match, PlayerId};
use serde::{Deserialize, Serialize};

/// Win/loss record and point totals for one player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_won: u64,
    pub points_lost: u64,
}

impl PlayerStats {
    /// Create empty statistics
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }

    /// Aggregate every match in `matches` that involves `player_id`
    pub fn from_matches<'a, I>(player_id: PlayerId, matches: I) -> Self
    where
        I: IntoIterator<Item = &'a Match>,
    {
        let mut stats = Self::new(player_id);
        for game in matches {
            stats.record(game);
        }
        stats
    }

    /// Update statistics with a match result; matches without this player are ignored
    pub fn record(&mut self, game: &Match) {
        let (points_for, points_against) = if game.winner == self.player_id {
            (game.winning_score, game.losing_score)
        } else if game.loser == self.player_id {
            (game.losing_score, game.winning_score)
        } else {
            return;
        };

        self.games_played += 1;
        self.points_won += u64::from(points_for);
        self.points_lost += u64::from(points_against);

        if game.draw {
            self.draws += 1;
        } else if game.winner == self.player_id {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn point_differential(&self) -> i64 {
        self.points_won as i64 - self.points_lost as i64
    }

    /// Points won per game, 0 with no games
    pub fn points_per_game(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.points_won as f64 / f64::from(self.games_played)
    }

    /// Point differential per game, 0 with no games
    pub fn avg_point_differential(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.point_differential() as f64 / f64::from(self.games_played)
    }

    /// Fraction of games won (0.0 to 1.0), 0 with no games
    pub fn win_percentage(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.games_played)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn game(id: u64, winner: PlayerId, loser: PlayerId, scores: (u32, u32), draw: bool) -> Match {
        Match {
            id,
            winner,
            loser,
            winning_score: scores.0,
            losing_score: scores.1,
            played_at: Utc::now(),
            draw,
        }
    }

    #[test]
    fn test_no_games_played() {
        let stats = PlayerStats::new(1);
        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.points_per_game(), 0.0);
        assert_eq!(stats.avg_point_differential(), 0.0);
        assert_eq!(stats.win_percentage(), 0.0);
    }

    #[test]
    fn test_counts_and_points() {
        let history = vec![
            game(1, 1, 2, (21, 19), false),
            game(2, 2, 1, (21, 10), false),
            game(3, 1, 3, (21, 15), false),
            game(4, 3, 1, (20, 20), true),
            game(5, 2, 3, (21, 5), false),
        ];

        let stats = PlayerStats::from_matches(1, &history);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.games_played, 4);
        assert_eq!(stats.wins + stats.losses + stats.draws, stats.games_played);

        assert_eq!(stats.points_won, 21 + 10 + 21 + 20);
        assert_eq!(stats.points_lost, 19 + 21 + 15 + 20);
        assert_eq!(stats.point_differential(), 72 - 75);
        assert_eq!(stats.points_per_game(), 18.0);
        assert_eq!(stats.avg_point_differential(), -0.75);
        assert_eq!(stats.win_percentage(), 0.5);
    }

    #[test]
    fn test_draw_counts_for_both_sides() {
        let history = vec![game(1, 4, 5, (21, 21), true)];

        let first = PlayerStats::from_matches(4, &history);
        let second = PlayerStats::from_matches(5, &history);
        assert_eq!(first.draws, 1);
        assert_eq!(second.draws, 1);
        assert_eq!(first.wins, 0);
        assert_eq!(second.losses, 0);
    }
}
