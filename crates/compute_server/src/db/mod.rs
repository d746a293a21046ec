//! Database persistence layer for players and prompts.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod seed;

pub use error::{DbError, DbErrorKind};
pub use models::{NewPlayer, Player, Prompt, PublicPlayer};
pub use repository::{BUSY_TIMEOUT_MS, GameRepository, MIGRATIONS};
pub use seed::seed_samples;
