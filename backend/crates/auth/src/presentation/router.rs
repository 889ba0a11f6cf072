//! Auth Router
//!
//! Routes under `/login`, `/logout`, and `/register`. Registration is
//! fully behind the anonymous guard; `POST /login` stays open so a
//! stale login page can still submit; `/logout` requires a logged-in
//! session. The session layer itself is applied by the app
//! composition, outside this router.

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{require_anonymous, require_authenticated};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    let anonymous_pages = Router::new()
        .route("/login", get(handlers::login_page::<R>))
        .route("/register", get(handlers::register_page::<R>).post(handlers::register::<R>))
        .route_layer(from_fn(require_anonymous));

    let authenticated_pages = Router::new()
        .route("/logout", get(handlers::logout::<R>))
        .route_layer(from_fn(require_authenticated));

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .merge(anonymous_pages)
        .merge(authenticated_pages)
        .with_state(state)
}
