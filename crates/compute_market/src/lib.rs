//! Compute market engine - pure game logic for the trivia-trading game.
//!
//! A player is shown a numeric-estimation prompt and quotes a bid/ask
//! spread. A simulated counterparty draws a private valuation around the
//! true answer and trades against the quote when it is favourable to do so.
//!
//! # Architecture
//!
//! - **Sampling**: Marsaglia polar method for Gaussian draws
//! - **Quote**: validated bid/ask spread
//! - **Difficulty**: multiplier on the counterparty's spread of opinion
//! - **Round**: resolution of one quote against one valuation
//! - **Session**: a timed sequence of rounds on a single prompt
//! - **Scoring**: normalized profit and position bonus
//! - **Stats**: the player's persistent record
//!
//! # Example
//!
//! ```
//! use compute_market::{FixedValuation, Quote, TradingSession};
//!
//! let mut session = TradingSession::new(6514.0);
//! let mut counterparty = FixedValuation::new(7000.0);
//!
//! // Ask below the counterparty's valuation: it buys from us.
//! let entry = session.submit(Quote::new(6000.0, 6900.0).unwrap(), &mut counterparty);
//! assert_eq!(*entry.change_position(), -1);
//!
//! let score = session.conclude();
//! assert!(*score.profit() > 0.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod difficulty;
mod normal;
mod quote;
mod round;
mod scoring;
mod session;
mod stats;

pub use difficulty::{Difficulty, INITIAL_DIFFICULTY, MIN_DIFFICULTY, TIGHTEN_FACTOR};
pub use normal::{Counterparty, FixedValuation, GaussianCounterparty, polar_sample};
pub use quote::{Quote, QuoteError, Side};
pub use round::{NUM_UNITS, RoundOutcome, Trade, resolve_round};
pub use scoring::{BONUS_SCALE, PROFIT_FLOOR, Score, round_half_up};
pub use session::{LogEntry, SESSION_DURATION, TradingSession};
pub use stats::{GameSummary, INITIAL_POINTS, PlayerStats};
