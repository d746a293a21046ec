//! Database models and domain types.

use compute_market::{INITIAL_POINTS, PlayerStats};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// Player account database model.
///
/// Carries the salt and password digest, so it is never serialized
/// directly; see [`PublicPlayer`].
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
pub struct Player {
    id: i32,
    username: String,
    salt: String,
    hashed_password: String,
    points: i64,
    num_wins: i64,
    num_played: i64,
    win_ratio: f64,
}

impl Player {
    /// The player's game statistics.
    pub fn stats(&self) -> PlayerStats {
        PlayerStats::new(self.points, self.num_wins, self.num_played, self.win_ratio)
    }

    /// The player record without credentials.
    pub fn to_public(&self) -> PublicPlayer {
        PublicPlayer {
            username: self.username.clone(),
            stats: self.stats(),
        }
    }
}

/// Insertable player model for new accounts.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    username: String,
    salt: String,
    hashed_password: String,
    points: i64,
    num_wins: i64,
    num_played: i64,
    win_ratio: f64,
}

impl NewPlayer {
    /// Creates a fresh account with the starting points and no games.
    pub fn new(username: String, salt: String, hashed_password: String) -> Self {
        Self {
            username,
            salt,
            hashed_password,
            points: INITIAL_POINTS,
            num_wins: 0,
            num_played: 0,
            win_ratio: 0.0,
        }
    }
}

/// Player record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct PublicPlayer {
    username: String,
    #[serde(flatten)]
    stats: PlayerStats,
}

/// Trivia prompt. Stored and served as-is.
#[derive(
    Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize, Getters, new,
)]
#[diesel(table_name = schema::prompts)]
pub struct Prompt {
    id: i64,
    contributor: String,
    question: String,
    answer: f64,
}
