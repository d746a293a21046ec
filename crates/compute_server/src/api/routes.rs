//! Route table and handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use compute_market::PlayerStats;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, instrument, warn};

use crate::api::{AddPromptRequest, LeaderboardQuery, LoginRequest, SignUpRequest, Success};
use crate::db::{Prompt, PublicPlayer};
use crate::leaderboard::Leaderboard;
use crate::service::{GameService, ServiceError};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    service: GameService,
}

impl AppState {
    /// Wraps the service for the router.
    pub fn new(service: GameService) -> Self {
        Self { service }
    }

    /// Runs blocking store work off the async executor.
    async fn run<T, F>(&self, work: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&GameService) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || work(&service))
            .await
            .map_err(|e| ServiceError::Internal {
                message: e.to_string(),
            })?
    }
}

/// Builds the `/api` router with CORS and request logging.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    info!("Building API router");
    Router::new()
        .route("/api", get(health))
        .route("/api/", get(health))
        .route("/api/players", get(list_players).post(sign_up))
        .route(
            "/api/players/{username}",
            get(player_stats).post(log_in).patch(update_stats),
        )
        .route("/api/prompts", get(random_prompt).post(add_prompt))
        .route("/api/leaderboard", get(leaderboard))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    info!(method = %method, uri = %uri, "Incoming HTTP request");

    let response = next.run(req).await;
    let status = response.status();
    if status.is_server_error() {
        warn!(status = ?status, uri = %uri, "Request failed");
    } else {
        info!(status = ?status, uri = %uri, "Response sent");
    }
    response
}

async fn health() -> Json<Success> {
    Json(Success::OK)
}

/// Body of `GET /players`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlayerList {
    /// Every username.
    pub players: Vec<String>,
}

#[instrument(skip(state))]
async fn list_players(State(state): State<AppState>) -> Result<Json<PlayerList>, ServiceError> {
    let players = state.run(|service| service.usernames()).await?;
    debug!(count = players.len(), "Listing players");
    Ok(Json(PlayerList { players }))
}

#[instrument(skip(state, body))]
async fn sign_up(
    State(state): State<AppState>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<PublicPlayer>, ServiceError> {
    let Json(req) = body?;
    let player = state
        .run(move |service| service.sign_up(&req.username, &req.password))
        .await?;
    Ok(Json(player))
}

#[instrument(skip(state))]
async fn player_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PlayerStats>, ServiceError> {
    let stats = state.run(move |service| service.stats(&username)).await?;
    Ok(Json(stats))
}

#[instrument(skip(state, body))]
async fn log_in(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<PublicPlayer>, ServiceError> {
    let Json(req) = body?;
    let player = state
        .run(move |service| service.log_in(&username, &req.password))
        .await?;
    Ok(Json(player))
}

#[instrument(skip(state, body))]
async fn update_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Result<Json<PlayerStats>, JsonRejection>,
) -> Result<Json<Success>, ServiceError> {
    let Json(stats) = body?;
    state
        .run(move |service| service.update_stats(&username, &stats))
        .await?;
    Ok(Json(Success::OK))
}

#[instrument(skip(state))]
async fn random_prompt(State(state): State<AppState>) -> Result<Json<Prompt>, ServiceError> {
    let prompt = state.run(|service| service.random_prompt()).await?;
    Ok(Json(prompt))
}

#[instrument(skip(state, body))]
async fn add_prompt(
    State(state): State<AppState>,
    body: Result<Json<AddPromptRequest>, JsonRejection>,
) -> Result<Json<Prompt>, ServiceError> {
    let Json(req) = body?;
    let prompt = state
        .run(move |service| service.add_prompt(&req.contributor, &req.question, req.answer))
        .await?;
    Ok(Json(prompt))
}

#[instrument(skip(state))]
async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Leaderboard>, ServiceError> {
    let num = query
        .num
        .as_deref()
        .and_then(|n| n.trim().parse::<i64>().ok())
        .ok_or_else(|| ServiceError::invalid("num must be a positive integer."))?;
    let board = state.run(move |service| service.leaderboard(num)).await?;
    Ok(Json(board))
}
