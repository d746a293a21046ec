//! Account, prompt, and leaderboard business logic.

use compute_market::PlayerStats;
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

use crate::auth::{generate_salt, hash_password, verify_password};
use crate::db::{DbError, GameRepository, NewPlayer, Prompt, PublicPlayer};
use crate::leaderboard::Leaderboard;

/// Failures of the game service, each mapping to one client-visible status.
#[derive(Debug, Display, Error)]
pub enum ServiceError {
    /// Sign-up with an existing username.
    #[display("Username already taken.")]
    UsernameTaken,
    /// No account under this username.
    #[display("A player with this username does not exist.")]
    PlayerNotFound,
    /// Password does not match.
    #[display("Incorrect password.")]
    IncorrectPassword,
    /// The prompt table is empty.
    #[display("No prompts available.")]
    NoPrompts,
    /// Request data failed validation.
    #[display("{message}")]
    InvalidInput {
        /// What was wrong.
        message: String,
    },
    /// The store failed.
    #[display("{source}")]
    Database {
        /// Underlying error.
        source: DbError,
    },
    /// A worker task failed.
    #[display("Internal error: {message}")]
    Internal {
        /// What failed.
        message: String,
    },
}

impl ServiceError {
    /// Validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(source: DbError) -> Self {
        Self::Database { source }
    }
}

/// Service layer over [`GameRepository`].
#[derive(Debug, Clone)]
pub struct GameService {
    repository: GameRepository,
}

impl GameService {
    /// Creates a new service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating GameService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// All usernames, in sign-up order.
    #[instrument(skip(self))]
    pub fn usernames(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.repository.list_usernames()?)
    }

    /// Creates an account with a fresh salt and the starting points.
    #[instrument(skip(self, password))]
    pub fn sign_up(&self, username: &str, password: &str) -> Result<PublicPlayer, ServiceError> {
        if username.trim().is_empty() {
            return Err(ServiceError::invalid("Username must not be empty."));
        }
        if password.is_empty() {
            return Err(ServiceError::invalid("Password must not be empty."));
        }
        if self.repository.get_player(username)?.is_some() {
            warn!("Username already taken");
            return Err(ServiceError::UsernameTaken);
        }

        let salt = generate_salt();
        let hashed = hash_password(&salt, password);
        let player = self
            .repository
            .create_player(NewPlayer::new(username.to_string(), salt, hashed))
            .map_err(|e| {
                // Lost a race with a concurrent sign-up.
                if e.is_unique_violation() {
                    ServiceError::UsernameTaken
                } else {
                    ServiceError::from(e)
                }
            })?;

        info!(player_id = player.id(), "Player signed up");
        Ok(player.to_public())
    }

    /// Checks credentials and returns the account.
    #[instrument(skip(self, password))]
    pub fn log_in(&self, username: &str, password: &str) -> Result<PublicPlayer, ServiceError> {
        let player = self
            .repository
            .get_player(username)?
            .ok_or(ServiceError::PlayerNotFound)?;

        if !verify_password(&player, password) {
            warn!("Incorrect password");
            return Err(ServiceError::IncorrectPassword);
        }

        debug!("Player logged in");
        Ok(player.to_public())
    }

    /// A player's current statistics.
    #[instrument(skip(self))]
    pub fn stats(&self, username: &str) -> Result<PlayerStats, ServiceError> {
        let player = self
            .repository
            .get_player(username)?
            .ok_or(ServiceError::PlayerNotFound)?;
        Ok(player.stats())
    }

    /// Replaces a player's statistics.
    #[instrument(skip(self))]
    pub fn update_stats(&self, username: &str, stats: &PlayerStats) -> Result<(), ServiceError> {
        if *stats.num_wins() < 0 || *stats.num_played() < 0 || stats.num_wins() > stats.num_played()
        {
            return Err(ServiceError::invalid("Win and play counts are inconsistent."));
        }
        if !stats.win_ratio().is_finite() {
            return Err(ServiceError::invalid("Win ratio must be a number."));
        }
        match self.repository.update_stats(username, stats)? {
            0 => Err(ServiceError::PlayerNotFound),
            _ => Ok(()),
        }
    }

    /// A uniformly random prompt.
    #[instrument(skip(self))]
    pub fn random_prompt(&self) -> Result<Prompt, ServiceError> {
        self.repository
            .random_prompt(&mut rand::rng())?
            .ok_or(ServiceError::NoPrompts)
    }

    /// Stores a contributed prompt under the next id.
    #[instrument(skip(self))]
    pub fn add_prompt(
        &self,
        contributor: &str,
        question: &str,
        answer: f64,
    ) -> Result<Prompt, ServiceError> {
        if question.trim().is_empty() {
            return Err(ServiceError::invalid("Question must not be empty."));
        }
        // Scores are normalized by the answer.
        if !answer.is_finite() || answer <= 0.0 {
            return Err(ServiceError::invalid("Answer must be a positive number."));
        }
        Ok(self
            .repository
            .insert_prompt(contributor.to_string(), question.to_string(), answer)?)
    }

    /// Top `num` players by points and by win ratio.
    #[instrument(skip(self))]
    pub fn leaderboard(&self, num: i64) -> Result<Leaderboard, ServiceError> {
        if num <= 0 {
            return Err(ServiceError::invalid("num must be a positive integer."));
        }
        let by_points = self.repository.top_by_points(num)?;
        let by_ratio = self.repository.top_by_win_ratio(num)?;
        Ok(Leaderboard(by_points, by_ratio))
    }
}
