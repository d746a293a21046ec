//! REST API over the game service.

mod error;
mod requests;
mod routes;

pub use error::ErrorBody;
pub use requests::{AddPromptRequest, LeaderboardQuery, LoginRequest, SignUpRequest, Success};
pub use routes::{AppState, PlayerList, router};
