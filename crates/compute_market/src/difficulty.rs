//! Adaptive difficulty multiplier.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Starting multiplier for a new game.
pub const INITIAL_DIFFICULTY: f64 = 0.5;

/// Factor applied after each profitable trade.
pub const TIGHTEN_FACTOR: f64 = 0.9;

/// The multiplier never drops below this value.
pub const MIN_DIFFICULTY: f64 = 0.1;

/// Scales the standard deviation of the counterparty's valuation.
///
/// Smaller values mean the counterparty's opinion clusters more tightly
/// around the true answer, so profitable quotes get harder to land.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Difficulty(f64);

impl Difficulty {
    /// Creates a multiplier, clamped to the floor.
    pub fn new(value: f64) -> Self {
        Self(value.max(MIN_DIFFICULTY))
    }

    /// Returns the raw multiplier.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Tightens the market after the player profited from a trade.
    #[instrument]
    pub fn tighten(&mut self) {
        let before = self.0;
        self.0 = (self.0 * TIGHTEN_FACTOR).max(MIN_DIFFICULTY);
        debug!(before, after = self.0, "Difficulty tightened");
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(INITIAL_DIFFICULTY)
    }
}
