//! Tests for a full trading session against the simulated counterparty.

use compute_market::{
    Difficulty, FixedValuation, GaussianCounterparty, MIN_DIFFICULTY, PlayerStats, Quote, Trade,
    TradingSession,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_wide_quote_rarely_trades_at_low_difficulty() {
    let mut session = TradingSession::with_difficulty(1000.0, Difficulty::new(MIN_DIFFICULTY));
    let mut counterparty = GaussianCounterparty::with_rng(StdRng::seed_from_u64(3));

    // Ten standard deviations either side of the answer.
    for _ in 0..200 {
        session.submit(Quote::new(1.0, 2000.0).expect("Valid quote"), &mut counterparty);
    }

    assert!(!*session.traded());
    assert_eq!(session.log().len(), 200);
    assert_eq!(session.conclude().total_points(), 0);
}

#[test]
fn test_tight_quote_trades_and_tightens() {
    let mut session = TradingSession::new(1000.0);
    let mut counterparty = GaussianCounterparty::with_rng(StdRng::seed_from_u64(11));

    // Every round fills; each lift of the ask above the answer tightens the market.
    for _ in 0..200 {
        session.submit(Quote::new(1001.0, 1001.0).expect("Valid quote"), &mut counterparty);
    }

    assert!(*session.traded());
    assert_eq!(session.difficulty().value(), MIN_DIFFICULTY);
}

#[test]
fn test_profitable_round_trip_scores_a_win() {
    let mut session = TradingSession::new(6514.0);

    // Counterparty values the windows high and buys at our ask.
    let sold = session.submit(Quote::new(6000.0, 7000.0).expect("Valid quote"), &mut FixedValuation::new(8000.0));
    assert_eq!(*sold.change_position(), -1);

    // Then values them low and sells at our bid.
    let bought = session.submit(Quote::new(6000.0, 7000.0).expect("Valid quote"), &mut FixedValuation::new(5000.0));
    assert_eq!(*bought.change_position(), 1);
    assert_eq!(*bought.net_position(), 0);
    assert_eq!(*bought.net_cash(), 1000.0);

    let score = session.conclude();
    assert!(score.is_win());
    assert_eq!(*score.bonus(), 90.0);

    let mut stats = PlayerStats::default();
    let summary = stats.record(&score);
    assert!(*summary.won());
    assert_eq!(*stats.points(), 500 + score.total_points());
}

#[test]
fn test_difficulty_carries_across_restart() {
    let mut session = TradingSession::new(100.0);
    for _ in 0..5 {
        session.submit(Quote::new(0.0, 150.0).expect("Valid quote"), &mut FixedValuation::new(200.0));
    }
    let carried = *session.difficulty();

    session.restart(6994.0);
    let entry = session.submit(Quote::new(0.0, 7500.0).expect("Valid quote"), &mut FixedValuation::new(8000.0));
    assert_eq!(*entry.net_position(), -1);
    assert!(session.difficulty().value() < carried.value());
}

#[test]
fn test_trade_serializes() {
    let json = serde_json::to_string(&Trade::CounterpartySold { price: 5.0 }).expect("Serialize");
    assert!(json.contains("CounterpartySold"));
}
