//! Player-submitted bid/ask spread.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;
use tracing::{debug, instrument};

/// One side of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// Price at which the player buys.
    Bid,
    /// Price at which the player sells.
    Ask,
}

/// Reasons a quote is rejected.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum QuoteError {
    /// Input was not a finite number.
    #[display("{side} is not a number: '{input}'")]
    NotANumber {
        /// Which side failed to parse.
        side: Side,
        /// The raw text.
        input: String,
    },
    /// A price was below zero.
    #[display("{side} must not be negative (got {price})")]
    Negative {
        /// Which side was negative.
        side: Side,
        /// The offending price.
        price: f64,
    },
    /// The ask was below the bid.
    #[display("ask {ask} is below bid {bid}")]
    Crossed {
        /// Quoted bid.
        bid: f64,
        /// Quoted ask.
        ask: f64,
    },
}

/// A valid spread: both prices finite and `0 <= bid <= ask`.
///
/// A price of exactly zero means the player is not quoting that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct Quote {
    bid: f64,
    ask: f64,
}

impl Quote {
    /// Validates a spread.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError`] for non-finite, negative, or crossed prices.
    pub fn new(bid: f64, ask: f64) -> Result<Self, QuoteError> {
        for (side, price) in [(Side::Bid, bid), (Side::Ask, ask)] {
            if !price.is_finite() {
                return Err(QuoteError::NotANumber {
                    side,
                    input: price.to_string(),
                });
            }
            if price < 0.0 {
                return Err(QuoteError::Negative { side, price });
            }
        }
        if ask < bid {
            return Err(QuoteError::Crossed { bid, ask });
        }
        Ok(Self { bid, ask })
    }

    /// Parses the two text fields of the quote form.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError`] when either field is not a number or the
    /// resulting spread is invalid.
    #[instrument]
    pub fn parse(bid: &str, ask: &str) -> Result<Self, QuoteError> {
        let bid = parse_side(Side::Bid, bid)?;
        let ask = parse_side(Side::Ask, ask)?;
        let quote = Self::new(bid, ask)?;
        debug!(bid, ask, "Quote parsed");
        Ok(quote)
    }

    /// Parses a single `"bid ask"` line, as typed at the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError`] when the line does not hold two valid prices.
    pub fn parse_line(line: &str) -> Result<Self, QuoteError> {
        let mut parts = line.split_whitespace();
        let bid = parts.next().unwrap_or_default();
        let ask = parts.next().unwrap_or_default();
        Self::parse(bid, ask)
    }
}

fn parse_side(side: Side, input: &str) -> Result<f64, QuoteError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| QuoteError::NotANumber {
            side,
            input: input.to_string(),
        })
}
