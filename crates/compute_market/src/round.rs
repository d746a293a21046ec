//! Resolution of a single quote against the counterparty.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{Counterparty, Difficulty, Quote};

/// Units the counterparty trades in each round.
pub const NUM_UNITS: i64 = 1;

/// What the counterparty did with the player's quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Trade {
    /// Counterparty bought from the player at the ask.
    CounterpartyBought {
        /// Execution price.
        price: f64,
    },
    /// Counterparty sold to the player at the bid.
    CounterpartySold {
        /// Execution price.
        price: f64,
    },
    /// No trade.
    Pass,
}

impl Trade {
    /// Change in the player's position.
    pub fn change_position(&self) -> i64 {
        match self {
            Self::CounterpartyBought { .. } => -NUM_UNITS,
            Self::CounterpartySold { .. } => NUM_UNITS,
            Self::Pass => 0,
        }
    }

    /// Change in the player's cash.
    pub fn change_cash(&self) -> f64 {
        match self {
            Self::CounterpartyBought { price } => *price * NUM_UNITS as f64,
            Self::CounterpartySold { price } => -*price * NUM_UNITS as f64,
            Self::Pass => 0.0,
        }
    }

    /// Whether any units changed hands.
    pub fn is_trade(&self) -> bool {
        !matches!(self, Self::Pass)
    }

    /// Whether the player came out ahead relative to the true answer:
    /// bought below it or sold above it.
    pub fn is_profitable(&self, answer: f64) -> bool {
        match self {
            Self::CounterpartySold { price } => *price < answer,
            Self::CounterpartyBought { price } => *price > answer,
            Self::Pass => false,
        }
    }
}

/// Result of one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct RoundOutcome {
    trade: Trade,
    valuation: f64,
    difficulty_after: Difficulty,
}

/// Resolves one round and tightens `difficulty` when the player profited.
///
/// The ask is checked first: if it is quoted and below the valuation the
/// counterparty buys. Otherwise a quoted bid above the valuation makes the
/// counterparty sell.
#[instrument(skip(counterparty, difficulty), fields(bid = quote.bid(), ask = quote.ask()))]
pub fn resolve_round<C: Counterparty + ?Sized>(
    answer: f64,
    difficulty: &mut Difficulty,
    quote: Quote,
    counterparty: &mut C,
) -> RoundOutcome {
    let valuation = counterparty.valuation(answer, *difficulty);
    let bid = *quote.bid();
    let ask = *quote.ask();

    let trade = if ask < valuation && ask != 0.0 {
        Trade::CounterpartyBought { price: ask }
    } else if bid > valuation && bid != 0.0 {
        Trade::CounterpartySold { price: bid }
    } else {
        Trade::Pass
    };

    if trade.is_profitable(answer) {
        difficulty.tighten();
    }

    debug!(?trade, valuation, "Round resolved");
    RoundOutcome {
        trade,
        valuation,
        difficulty_after: *difficulty,
    }
}
