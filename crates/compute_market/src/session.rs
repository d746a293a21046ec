//! A timed trading session on a single prompt.
//!
//! Each session has one prompt and an unlimited number of rounds within
//! [`SESSION_DURATION`]. The session keeps the game log: bid and ask
//! history, the change in position and cash from each round, and their
//! running totals.

use std::time::Duration;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{Counterparty, Difficulty, Quote, Score, resolve_round};

/// Wall-clock length of a session.
pub const SESSION_DURATION: Duration = Duration::from_secs(90);

/// One row of the game log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct LogEntry {
    bid: f64,
    ask: f64,
    change_position: i64,
    net_position: i64,
    change_cash: f64,
    net_cash: f64,
}

impl LogEntry {
    /// Formats a change with an explicit sign, `+` included for zero.
    pub fn signed<T: std::fmt::Display + PartialOrd + Default>(value: T) -> String {
        if value < T::default() {
            format!("{value}")
        } else {
            format!("+{value}")
        }
    }
}

/// Session state for one prompt.
///
/// Difficulty belongs to the player's game rather than to a single prompt,
/// so [`TradingSession::restart`] keeps it.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct TradingSession {
    answer: f64,
    difficulty: Difficulty,
    net_position: i64,
    net_cash: f64,
    traded: bool,
    log: Vec<LogEntry>,
}

impl TradingSession {
    /// Starts a session at the initial difficulty.
    #[instrument]
    pub fn new(answer: f64) -> Self {
        Self::with_difficulty(answer, Difficulty::default())
    }

    /// Starts a session at a given difficulty.
    pub fn with_difficulty(answer: f64, difficulty: Difficulty) -> Self {
        Self {
            answer,
            difficulty,
            net_position: 0,
            net_cash: 0.0,
            traded: false,
            log: Vec::new(),
        }
    }

    /// Plays one round and appends it to the log.
    #[instrument(skip(self, counterparty), fields(answer = self.answer))]
    pub fn submit<C: Counterparty + ?Sized>(
        &mut self,
        quote: Quote,
        counterparty: &mut C,
    ) -> LogEntry {
        let outcome = resolve_round(self.answer, &mut self.difficulty, quote, counterparty);
        let trade = outcome.trade();

        self.net_position += trade.change_position();
        self.net_cash += trade.change_cash();
        self.traded |= trade.is_trade();

        let entry = LogEntry {
            bid: *quote.bid(),
            ask: *quote.ask(),
            change_position: trade.change_position(),
            net_position: self.net_position,
            change_cash: trade.change_cash(),
            net_cash: self.net_cash,
        };
        self.log.push(entry);
        entry
    }

    /// Scores the session as it stands.
    #[instrument(skip(self), fields(rounds = self.log.len()))]
    pub fn conclude(&self) -> Score {
        let score = Score::compute(self.answer, self.net_position, self.net_cash, self.traded);
        info!(
            profit = score.profit(),
            bonus = score.bonus(),
            net_position = self.net_position,
            net_cash = self.net_cash,
            "Session concluded"
        );
        score
    }

    /// Starts over on a new prompt, keeping the current difficulty.
    #[instrument(skip(self))]
    pub fn restart(&mut self, answer: f64) {
        *self = Self::with_difficulty(answer, self.difficulty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedValuation;

    #[test]
    fn signed_formats_changes() {
        assert_eq!(LogEntry::signed(-1i64), "-1");
        assert_eq!(LogEntry::signed(0i64), "+0");
        assert_eq!(LogEntry::signed(110.5), "+110.5");
    }

    #[test]
    fn log_tracks_running_totals() {
        let mut session = TradingSession::new(100.0);
        session.submit(Quote::new(90.0, 110.0).unwrap(), &mut FixedValuation::new(120.0));
        let second = session.submit(Quote::new(95.0, 130.0).unwrap(), &mut FixedValuation::new(90.0));

        assert_eq!(*second.change_position(), 1);
        assert_eq!(*second.net_position(), 0);
        assert_eq!(*second.net_cash(), 15.0);
        assert_eq!(session.log().len(), 2);
        assert!(*session.traded());
    }

    #[test]
    fn restart_keeps_difficulty() {
        let mut session = TradingSession::new(100.0);
        session.submit(Quote::new(0.0, 150.0).unwrap(), &mut FixedValuation::new(200.0));
        let tightened = *session.difficulty();
        assert!(tightened.value() < Difficulty::default().value());

        session.restart(328_200_000.0);
        assert_eq!(*session.difficulty(), tightened);
        assert_eq!(*session.net_position(), 0);
        assert_eq!(*session.net_cash(), 0.0);
        assert!(!*session.traded());
        assert!(session.log().is_empty());
        assert_eq!(*session.answer(), 328_200_000.0);
    }
}
