//! Compute - unified CLI
//!
//! Runs the REST server or plays against one from the terminal.

#![warn(missing_docs)]

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use compute_market::GaussianCounterparty;
use compute_server::{Cli, ClientError, Command, ComputeClient, ServerConfig, init_tracing, play};
use tokio::io::BufReader;
use tracing::{info, instrument};

/// Leaders shown before a game.
const LEADERBOARD_SIZE: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            port,
            host,
            db_path,
            seed,
        } => {
            let config = ServerConfig::load(Some(Path::new(&config)))?
                .with_host(host)
                .with_port(port)
                .with_database_path(db_path)
                .with_seed(seed);
            init_tracing(config.log_filter());
            info!("Starting Compute server");
            compute_server::serve(config).await
        }
        Command::Play {
            server_url,
            username,
            password,
            sign_up,
            seconds,
        } => {
            init_tracing("warn");
            run_play(server_url, username, password, sign_up, seconds).await
        }
        Command::Leaderboard { server_url, num } => {
            init_tracing("warn");
            let client = ComputeClient::new(server_url);
            let board = client.leaderboard(num).await?;
            print!("{}", board.render(num as usize));
            Ok(())
        }
        Command::AddPrompt {
            server_url,
            contributor,
            question,
            answer,
        } => {
            init_tracing("warn");
            let client = ComputeClient::new(server_url);
            let prompt = client.add_prompt(&contributor, &question, answer).await?;
            println!("Added prompt #{}", prompt.id());
            Ok(())
        }
    }
}

/// Logs in (or signs up), shows the leaderboard, then plays.
#[instrument(skip(password))]
async fn run_play(
    server_url: String,
    username: String,
    password: String,
    sign_up: bool,
    seconds: u64,
) -> Result<()> {
    let client = ComputeClient::new(server_url);

    if sign_up && client.is_taken(&username).await? {
        println!("Username already taken.");
        return Ok(());
    }

    let account = if sign_up {
        client.create(&username, &password).await
    } else {
        client.validate(&username, &password).await
    };
    let account = match account {
        Ok(account) => account,
        Err(e @ (ClientError::Username { .. } | ClientError::Password { .. })) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", account.stats().header(account.username()))?;
    match client.leaderboard(LEADERBOARD_SIZE).await {
        Ok(board) => write!(stdout, "{}", board.render(LEADERBOARD_SIZE as usize))?,
        Err(e) => writeln!(stdout, "Leaderboard unavailable: {}", e)?,
    }

    let mut counterparty = GaussianCounterparty::new();
    let input = BufReader::new(tokio::io::stdin());
    play(
        &client,
        &mut counterparty,
        &username,
        Duration::from_secs(seconds),
        input,
        &mut stdout,
    )
    .await?;
    Ok(())
}
