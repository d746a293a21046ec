//! Game loop against an in-memory backend.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use compute_market::{FixedValuation, PlayerStats};
use compute_server::{ClientError, GameBackend, Prompt, play};
use tokio::io::{AsyncWriteExt, BufReader};

struct FakeBackend {
    stats: Mutex<PlayerStats>,
    prompt: Prompt,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            stats: Mutex::new(PlayerStats::default()),
            prompt: Prompt::new(
                0,
                "sample1".to_string(),
                "Number of windows in Empire State Building?".to_string(),
                6514.0,
            ),
        }
    }

    fn stats(&self) -> PlayerStats {
        *self.stats.lock().unwrap()
    }
}

#[async_trait]
impl GameBackend for FakeBackend {
    async fn load_stats(&self, _username: &str) -> Result<PlayerStats, ClientError> {
        Ok(self.stats())
    }

    async fn update_stats(&self, _username: &str, stats: &PlayerStats) -> Result<(), ClientError> {
        *self.stats.lock().unwrap() = *stats;
        Ok(())
    }

    async fn random_prompt(&self) -> Result<Prompt, ClientError> {
        Ok(self.prompt.clone())
    }
}

#[tokio::test]
async fn test_sold_at_ask_scores_a_win_when_input_ends() {
    let backend = FakeBackend::new();
    let mut counterparty = FixedValuation::new(8000.0);
    let input = BufReader::new(&b"6000 7000\nabc\n"[..]);
    let mut out = Vec::new();

    let summaries = play(
        &backend,
        &mut counterparty,
        "sample1",
        Duration::from_secs(60),
        input,
        &mut out,
    )
    .await
    .expect("Game failed");

    // Short one unit at 7000 against 6514: +7 profit, +23 bonus.
    assert_eq!(summaries.len(), 1);
    assert!(*summaries[0].won());
    assert_eq!(*summaries[0].points(), 7);
    assert_eq!(*summaries[0].bonus(), 23);

    let stats = backend.stats();
    assert_eq!(*stats.points(), 530);
    assert_eq!(*stats.num_wins(), 1);
    assert_eq!(*stats.num_played(), 1);
    assert_eq!(*stats.win_ratio(), 1.0);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Empire State"));
    assert!(text.contains("+7000"));
    assert!(text.contains("Congrats!"));
    assert!(text.contains("sample1: 530 points | 1 won | 1.00 win:loss ratio"));
}

#[tokio::test]
async fn test_no_trade_is_a_loss_without_points() {
    let backend = FakeBackend::new();
    let mut counterparty = FixedValuation::new(6514.0);
    let input = BufReader::new(&b"6000 7000\n"[..]);
    let mut out = Vec::new();

    let summaries = play(
        &backend,
        &mut counterparty,
        "sample1",
        Duration::from_secs(60),
        input,
        &mut out,
    )
    .await
    .unwrap();

    assert!(!*summaries[0].won());
    let stats = backend.stats();
    assert_eq!(*stats.points(), 500);
    assert_eq!(*stats.num_wins(), 0);
    assert_eq!(*stats.num_played(), 1);
}

#[tokio::test]
async fn test_timer_ends_game_then_player_declines() {
    let backend = FakeBackend::new();
    let mut counterparty = FixedValuation::new(8000.0);
    let (reader, mut writer) = tokio::io::duplex(64);

    let typist = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        writer.write_all(b"n\n").await.unwrap();
        writer
    });

    let mut out = Vec::new();
    let summaries = play(
        &backend,
        &mut counterparty,
        "sample1",
        Duration::from_millis(50),
        BufReader::new(reader),
        &mut out,
    )
    .await
    .unwrap();
    drop(typist.await.unwrap());

    assert_eq!(summaries.len(), 1);
    assert_eq!(*backend.stats().num_played(), 1);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Time's up!"));
    assert!(text.contains("Play again?"));
}

#[tokio::test]
async fn test_play_again_keeps_going() {
    let backend = FakeBackend::new();
    let mut counterparty = FixedValuation::new(8000.0);
    let (reader, mut writer) = tokio::io::duplex(64);

    let typist = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        writer.write_all(b"y\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        writer.write_all(b"n\n").await.unwrap();
        writer
    });

    let summaries = play(
        &backend,
        &mut counterparty,
        "sample1",
        Duration::from_millis(50),
        BufReader::new(reader),
        &mut Vec::new(),
    )
    .await
    .unwrap();
    drop(typist.await.unwrap());

    assert_eq!(summaries.len(), 2);
    assert_eq!(*backend.stats().num_played(), 2);
}
