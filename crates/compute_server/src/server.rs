//! HTTP server startup.

use anyhow::{Context, Result};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

use crate::api::{AppState, router};
use crate::config::ServerConfig;
use crate::db::{GameRepository, seed_samples};
use crate::service::GameService;

/// Installs the global subscriber. `RUST_LOG` wins over `fallback`.
pub fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

/// Opens the store, applies migrations, optionally seeds, and serves the API
/// until the process receives Ctrl-C.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: ServerConfig) -> Result<()> {
    let repository = GameRepository::new(config.database_path().clone())?;
    repository
        .run_migrations()
        .context("Failed to migrate database")?;
    if *config.seed() {
        seed_samples(&repository).context("Failed to seed sample data")?;
    }

    let app = router(AppState::new(GameService::new(repository)));

    let addr = format!("{}:{}", config.host(), config.port());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server ready at http://{}/api", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
