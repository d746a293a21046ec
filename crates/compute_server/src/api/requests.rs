//! Request and acknowledgement bodies.

use serde::{Deserialize, Serialize};

/// `POST /players`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    /// Desired username.
    pub username: String,
    /// Plain-text password; only its salted digest is stored.
    pub password: String,
}

/// `POST /players/{username}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Password attempt.
    pub password: String,
}

/// `POST /prompts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPromptRequest {
    /// Username of the contributor.
    pub contributor: String,
    /// Question text.
    pub question: String,
    /// True numeric answer.
    pub answer: f64,
}

/// `GET /leaderboard?num=N`. Kept as text so a bad value gets a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    /// How many players to rank.
    pub num: Option<String>,
}

/// `{"success": true}` acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Success {
    /// Always true.
    pub success: bool,
}

impl Success {
    /// The acknowledgement.
    pub const OK: Self = Self { success: true };
}
