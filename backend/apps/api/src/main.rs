//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth::domain::repository::SessionRepository;
use auth::presentation::middleware::{SessionLayerState, session_layer};
use auth::{PgAuthRepository, auth_router};
use gallery::{HttpPhotoStore, gallery_router};

use crate::config::{AppConfig, AppEnv};
use crate::middleware::method_override;

mod config;
mod middleware;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_env = AppEnv::from_env();

    // Production gets its environment from the deployment, not a file
    if !app_env.is_production() {
        dotenvy::dotenv().ok();
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,gallery=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env(app_env)?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = PgAuthRepository::new(pool.clone());

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    match repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    let store = HttpPhotoStore::new(config.storage_url.clone());

    let session_state = SessionLayerState::new(
        Arc::new(repo.clone()),
        Arc::new(config.auth.clone()),
    );

    // Build router; layers run bottom-up per request:
    // trace -> method override -> session -> guards -> handler
    let app = Router::new()
        .merge(auth_router(repo.clone(), config.auth.clone()))
        .merge(gallery_router(store, repo, config.gallery.clone()))
        .layer(axum::middleware::from_fn_with_state(
            session_state,
            session_layer::<PgAuthRepository>,
        ))
        .layer(axum::middleware::from_fn(method_override))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.bind_addr();
    tracing::info!(app_name = kernel::APP_NAME, "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
