//! Typed HTTP client for the REST API.
//!
//! Status codes are folded into the two error kinds a player can act on:
//! a bad username and a bad password.

use async_trait::async_trait;
use compute_market::PlayerStats;
use derive_more::{Display, Error};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::api::{AddPromptRequest, LoginRequest, PlayerList, SignUpRequest};
use crate::db::{Prompt, PublicPlayer};
use crate::leaderboard::Leaderboard;
use crate::play::GameBackend;

/// Client-side failures.
#[derive(Debug, Display, Error)]
pub enum ClientError {
    /// The username is taken or unknown.
    #[display("{message}")]
    Username {
        /// Message for the player.
        message: String,
    },
    /// The password did not match.
    #[display("{message}")]
    Password {
        /// Message for the player.
        message: String,
    },
    /// A prompt could not be fetched or stored.
    #[display("{message}")]
    Prompt {
        /// Message for the player.
        message: String,
    },
    /// Any other unexpected status.
    #[display("Unexpected status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// The base URL cannot take a path.
    #[display("Invalid server URL: {url}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },
    /// Request never completed or the body was malformed.
    #[display("Transport error: {source}")]
    Transport {
        /// Underlying error.
        source: reqwest::Error,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport { source }
    }
}

fn username_error(message: &str) -> ClientError {
    ClientError::Username {
        message: message.to_string(),
    }
}

const NO_SUCH_PLAYER: &str = "A player with this username does not exist.";

/// HTTP client bound to one server.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    base_url: String,
    client: reqwest::Client,
}

impl ComputeClient {
    /// Creates a client for a server such as `http://localhost:3000`.
    #[instrument]
    pub fn new(base_url: String) -> Self {
        info!("Creating REST client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Builds `base/api/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl {
            url: self.base_url.clone(),
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        Ok(response.json::<T>().await?)
    }

    /// Whether an account exists under `username`.
    #[instrument(skip(self))]
    pub async fn is_taken(&self, username: &str) -> Result<bool, ClientError> {
        let response = self.client.get(self.endpoint(&["players"])?).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
            });
        }
        let list: PlayerList = Self::read(response).await?;
        Ok(list.players.iter().any(|taken| taken == username))
    }

    /// Signs up a new player.
    #[instrument(skip(self, password))]
    pub async fn create(&self, username: &str, password: &str) -> Result<PublicPlayer, ClientError> {
        let body = SignUpRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint(&["players"])?)
            .json(&body)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "Sign-up rejected");
            return Err(username_error("Username already taken."));
        }
        Self::read(response).await
    }

    /// Logs in an existing player.
    #[instrument(skip(self, password))]
    pub async fn validate(&self, username: &str, password: &str) -> Result<PublicPlayer, ClientError> {
        let body = LoginRequest {
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint(&["players", username])?)
            .json(&body)
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => Self::read(response).await,
            StatusCode::NOT_FOUND => Err(username_error(NO_SUCH_PLAYER)),
            _ => Err(ClientError::Password {
                message: "Incorrect password.".to_string(),
            }),
        }
    }

    /// Loads a player's current statistics.
    #[instrument(skip(self))]
    pub async fn load_stats(&self, username: &str) -> Result<PlayerStats, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&["players", username])?)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(username_error(NO_SUCH_PLAYER));
        }
        Self::read(response).await
    }

    /// Replaces a player's statistics.
    #[instrument(skip(self))]
    pub async fn update_stats(&self, username: &str, stats: &PlayerStats) -> Result<(), ClientError> {
        let response = self
            .client
            .patch(self.endpoint(&["players", username])?)
            .json(stats)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(username_error(NO_SUCH_PLAYER));
        }
        Ok(())
    }

    /// Fetches a random prompt.
    #[instrument(skip(self))]
    pub async fn random_prompt(&self) -> Result<Prompt, ClientError> {
        let response = self.client.get(self.endpoint(&["prompts"])?).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ClientError::Prompt {
                message: "Failed to retrieve a prompt.".to_string(),
            });
        }
        Self::read(response).await
    }

    /// Contributes a prompt.
    #[instrument(skip(self))]
    pub async fn add_prompt(
        &self,
        contributor: &str,
        question: &str,
        answer: f64,
    ) -> Result<Prompt, ClientError> {
        let body = AddPromptRequest {
            contributor: contributor.to_string(),
            question: question.to_string(),
            answer,
        };
        let response = self
            .client
            .post(self.endpoint(&["prompts"])?)
            .json(&body)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(ClientError::Prompt {
                message: "Failed to add it :(".to_string(),
            });
        }
        Self::read(response).await
    }

    /// Loads the top `num` players by points and by win ratio.
    #[instrument(skip(self))]
    pub async fn leaderboard(&self, num: u32) -> Result<Leaderboard, ClientError> {
        let mut url = self.endpoint(&["leaderboard"])?;
        url.query_pairs_mut().append_pair("num", &num.to_string());
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
            });
        }
        Self::read(response).await
    }
}

#[async_trait]
impl GameBackend for ComputeClient {
    async fn load_stats(&self, username: &str) -> Result<PlayerStats, ClientError> {
        ComputeClient::load_stats(self, username).await
    }

    async fn update_stats(&self, username: &str, stats: &PlayerStats) -> Result<(), ClientError> {
        ComputeClient::update_stats(self, username, stats).await
    }

    async fn random_prompt(&self) -> Result<Prompt, ClientError> {
        ComputeClient::random_prompt(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_username() {
        let client = ComputeClient::new("http://localhost:3000".to_string());
        let url = client.endpoint(&["players", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/players/a%20b%2Fc");
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let client = ComputeClient::new("http://localhost:3000/".to_string());
        let url = client.endpoint(&["prompts"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/prompts");
    }

    #[test]
    fn endpoint_rejects_garbage() {
        let client = ComputeClient::new("not a url".to_string());
        assert!(matches!(
            client.endpoint(&["players"]),
            Err(ClientError::InvalidUrl { .. })
        ));
    }
}
