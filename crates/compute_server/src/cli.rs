//! Command-line interface for compute.

use clap::{Parser, Subcommand};
use compute_market::SESSION_DURATION;

/// Compute - trivia-trading game server and terminal client
#[derive(Parser, Debug)]
#[command(name = "compute")]
#[command(about = "Quote bid/ask spreads on trivia and climb the leaderboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST API server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long, default_value = "compute.toml")]
        config: std::path::PathBuf,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// SQLite database file (overrides config)
        #[arg(long)]
        db_path: Option<String>,

        /// Insert sample players and prompts into empty tables
        #[arg(long)]
        seed: bool,
    },

    /// Log in (or sign up) and play in the terminal
    Play {
        /// Game server URL
        #[arg(long, default_value = "http://localhost:3000")]
        server_url: String,

        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short = 'P', long)]
        password: String,

        /// Create the account instead of logging in
        #[arg(long)]
        sign_up: bool,

        /// Seconds per game
        #[arg(long, default_value_t = SESSION_DURATION.as_secs())]
        seconds: u64,
    },

    /// Show the leaderboard
    Leaderboard {
        /// Game server URL
        #[arg(long, default_value = "http://localhost:3000")]
        server_url: String,

        /// Number of players to rank
        #[arg(short, long, default_value = "5")]
        num: u32,
    },

    /// Contribute a prompt
    AddPrompt {
        /// Game server URL
        #[arg(long, default_value = "http://localhost:3000")]
        server_url: String,

        /// Contributor username
        #[arg(long)]
        contributor: String,

        /// Question text
        #[arg(long)]
        question: String,

        /// True numeric answer
        #[arg(long)]
        answer: f64,
    },
}
