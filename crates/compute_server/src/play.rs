//! Terminal game loop.
//!
//! Each game shows one prompt and runs for a fixed time with unlimited
//! rounds. Every line the player types is a `bid ask` quote; the simulated
//! counterparty responds by selling one unit at the bid, buying one at the
//! ask, or doing neither. When time runs out the session is scored, the
//! player's stats are written back, and the player may go again on a new
//! prompt at the difficulty they have reached.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use compute_market::{Counterparty, GameSummary, LogEntry, PlayerStats, Quote, TradingSession};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, info, instrument};

use crate::client::ClientError;
use crate::db::Prompt;

/// What the game loop needs from the backend.
#[async_trait]
pub trait GameBackend: Send + Sync {
    /// Current statistics for a player.
    async fn load_stats(&self, username: &str) -> Result<PlayerStats, ClientError>;

    /// Writes back a player's statistics.
    async fn update_stats(&self, username: &str, stats: &PlayerStats) -> Result<(), ClientError>;

    /// A random prompt to play.
    async fn random_prompt(&self) -> Result<Prompt, ClientError>;
}

/// Column headings of the game log.
const HEADINGS: [&str; 6] = ["BID", "ASK", "\u{0394}POS", "\u{21D2}NET", "\u{0394}$", "\u{21D2}NET"];

/// Whether the player's input stream is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Open,
    Closed,
}

/// Formats one row of the game log.
pub fn format_row(entry: &LogEntry) -> String {
    format!(
        "{:>12} {:>12} {:>6} {:>6} {:>12} {:>12}",
        entry.bid(),
        entry.ask(),
        LogEntry::signed(*entry.change_position()),
        entry.net_position(),
        LogEntry::signed(*entry.change_cash()),
        entry.net_cash()
    )
}

fn format_headings() -> String {
    format!(
        "{:>12} {:>12} {:>6} {:>6} {:>12} {:>12}",
        HEADINGS[0], HEADINGS[1], HEADINGS[2], HEADINGS[3], HEADINGS[4], HEADINGS[5]
    )
}

/// Plays games until the player declines another or input ends.
///
/// Returns the summary of every completed game.
#[instrument(skip(backend, counterparty, input, out))]
pub async fn play<B, C, R, W>(
    backend: &B,
    counterparty: &mut C,
    username: &str,
    duration: Duration,
    input: R,
    out: &mut W,
) -> Result<Vec<GameSummary>>
where
    B: GameBackend + ?Sized,
    C: Counterparty + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut session: Option<TradingSession> = None;
    let mut summaries = Vec::new();

    loop {
        let prompt = backend.random_prompt().await?;
        info!(prompt_id = prompt.id(), "Starting game");

        if let Some(previous) = session.as_mut() {
            previous.restart(*prompt.answer());
        }
        let current = session.get_or_insert_with(|| TradingSession::new(*prompt.answer()));

        writeln!(out, "{}", prompt.question())?;
        writeln!(out, "Quote as: <bid> <ask>")?;
        writeln!(out, "{}", format_headings())?;

        let input_state = trade_until_deadline(current, counterparty, duration, &mut lines, out).await?;

        let score = current.conclude();
        let mut stats = backend.load_stats(username).await?;
        let summary = stats.record(&score);
        backend.update_stats(username, &stats).await?;

        writeln!(out, "{}", summary.headline())?;
        writeln!(out, "{}", summary.points_line())?;
        writeln!(out, "{}", stats.header(username))?;
        summaries.push(summary);

        if input_state == Input::Closed {
            break;
        }

        writeln!(out, "Play again? [y/N]")?;
        out.flush()?;
        match lines.next_line().await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    info!(games = summaries.len(), "Finished playing");
    Ok(summaries)
}

async fn trade_until_deadline<C, R, W>(
    session: &mut TradingSession,
    counterparty: &mut C,
    duration: Duration,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<Input>
where
    C: Counterparty + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);
    out.flush()?;

    loop {
        tokio::select! {
            _ = &mut deadline => {
                writeln!(out, "Time's up!")?;
                return Ok(Input::Open);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    return Ok(Input::Closed);
                };
                match Quote::parse_line(&line) {
                    Ok(quote) => {
                        let entry = session.submit(quote, counterparty);
                        writeln!(out, "{}", format_row(&entry))?;
                    }
                    // Malformed quotes are dropped without playing a round.
                    Err(e) => debug!(error = %e, "Ignoring quote"),
                }
                out.flush()?;
            }
        }
    }
}
