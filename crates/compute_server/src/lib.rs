//! Compute server library - REST backend and clients for the trivia-trading game.
//!
//! # Architecture
//!
//! - **Db**: SQLite persistence for players and prompts (diesel)
//! - **Auth**: salted SHA-256 password digests
//! - **Service**: account, prompt, and leaderboard logic
//! - **Api**: axum routes under `/api`
//! - **Client**: typed reqwest client for the API
//! - **Play**: terminal game loop over the market engine
//!
//! # Example
//!
//! ```no_run
//! use compute_server::{GameRepository, GameService, ServerConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let repository = GameRepository::new(config.database_path().clone())?;
//! repository.run_migrations()?;
//! let service = GameService::new(repository);
//! let board = service.leaderboard(5)?;
//! println!("{}", board.render(5));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
mod auth;
mod cli;
mod client;
mod config;
mod db;
mod leaderboard;
mod play;
mod server;
mod service;

// Crate-level exports - Password digests
pub use auth::{generate_salt, hash_password, verify_password};

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - HTTP client
pub use client::{ClientError, ComputeClient};

// Crate-level exports - Configuration
pub use config::{ConfigError, DATABASE_PATH_ENV, PORT_ENV, ServerConfig};

// Crate-level exports - Persistence
pub use db::{
    BUSY_TIMEOUT_MS, DbError, DbErrorKind, GameRepository, MIGRATIONS, NewPlayer, Player, Prompt,
    PublicPlayer, seed_samples,
};

// Crate-level exports - Leaderboard
pub use leaderboard::{Leaderboard, rank_label};

// Crate-level exports - Game loop
pub use play::{GameBackend, format_row, play};

// Crate-level exports - Server
pub use server::{init_tracing, serve};

// Crate-level exports - Service layer
pub use service::{GameService, ServiceError};
