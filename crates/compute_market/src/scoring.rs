//! End-of-session scoring.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Normalized profit never scores below this.
pub const PROFIT_FLOOR: f64 = -100.0;

/// Numerator of the flat-position bonus.
pub const BONUS_SCALE: f64 = 90.0;

/// Rounds to the nearest integer, with halves going toward positive infinity.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Score for one finished session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct Score {
    /// Profit as a percentage of the true answer, floored at -100.
    profit: f64,
    /// Reward for ending close to flat; zero if no trade happened.
    bonus: f64,
}

impl Score {
    /// Scores a session from its final position and cash.
    ///
    /// Profit is marked to the true answer and expressed in percent of it,
    /// so prompts of very different magnitude score on the same scale.
    #[instrument]
    pub fn compute(answer: f64, position: i64, cash: f64, traded: bool) -> Self {
        let net_profit = cash + position as f64 * answer;
        let profit = (net_profit * 100.0 / answer).max(PROFIT_FLOOR);
        let bonus = if traded {
            let flatness = (position.unsigned_abs() as f64 + 1.0).powi(2);
            (BONUS_SCALE / flatness).max(0.0)
        } else {
            0.0
        };
        debug!(profit, bonus, "Session scored");
        Self { profit, bonus }
    }

    /// A session is won on profit alone; the bonus does not count.
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    /// Rounded profit points.
    pub fn profit_points(&self) -> i64 {
        round_half_up(self.profit)
    }

    /// Rounded bonus points.
    pub fn bonus_points(&self) -> i64 {
        round_half_up(self.bonus)
    }

    /// Points added to the player's total.
    pub fn total_points(&self) -> i64 {
        self.profit_points() + self.bonus_points()
    }
}
