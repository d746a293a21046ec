//! Player statistics and their update at the end of a session.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::Score;

/// Points a new account starts with.
pub const INITIAL_POINTS: i64 = 500;

/// Persistent per-player record, as exchanged with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    points: i64,
    num_wins: i64,
    num_played: i64,
    win_ratio: f64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            points: INITIAL_POINTS,
            num_wins: 0,
            num_played: 0,
            win_ratio: 0.0,
        }
    }
}

impl PlayerStats {
    /// Applies a finished session's score and returns what happened.
    #[instrument(skip(self), fields(points = self.points, num_played = self.num_played))]
    pub fn record(&mut self, score: &Score) -> GameSummary {
        self.points += score.total_points();
        self.num_played += 1;
        if score.is_win() {
            self.num_wins += 1;
        }
        self.win_ratio = ratio(self.num_wins, self.num_played);

        info!(
            points = self.points,
            num_wins = self.num_wins,
            win_ratio = self.win_ratio,
            "Player stats updated"
        );
        GameSummary::new(score.is_win(), score.profit_points(), score.bonus_points())
    }

    /// Renders the stats header shown above the game.
    pub fn header(&self, username: &str) -> String {
        format!(
            "{}: {} points | {} won | {:.2} win:loss ratio",
            username, self.points, self.num_wins, self.win_ratio
        )
    }
}

/// Wins over games played, rounded to two decimals.
fn ratio(wins: i64, played: i64) -> f64 {
    if played == 0 {
        0.0
    } else {
        (wins as f64 / played as f64 * 100.0).round() / 100.0
    }
}

/// Outcome of one session, as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct GameSummary {
    won: bool,
    points: i64,
    bonus: i64,
}

impl GameSummary {
    /// Headline message.
    pub fn headline(&self) -> &'static str {
        if self.won {
            "Congrats! \u{1F4B0}"
        } else {
            "Better luck next time. \u{1F927}"
        }
    }

    /// Points line, e.g. `+20 points with +90 bonus.`
    pub fn points_line(&self) -> String {
        if self.won {
            format!("+{} points with +{} bonus.", self.points, self.bonus)
        } else {
            format!("{} points with +{} bonus.", self.points, self.bonus)
        }
    }
}
