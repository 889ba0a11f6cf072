//! Gallery Router
//!
//! The gallery pages sit behind the authenticated guard; the upload
//! form, upload POST, and removal route are open, matching the
//! original app. The session layer is applied by the app composition.

use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post},
};
use std::sync::Arc;

use auth::domain::repository::SessionRepository;
use auth::presentation::middleware::require_authenticated;

use crate::application::config::GalleryConfig;
use crate::domain::store::PhotoStore;
use crate::infra::http::HttpPhotoStore;
use crate::presentation::handlers::{self, GalleryAppState};

/// Create the Gallery router with the HTTP photo store
pub fn gallery_router<S>(
    store: HttpPhotoStore,
    sessions: S,
    config: GalleryConfig,
) -> Router
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    gallery_router_generic(store, sessions, config)
}

/// Create a generic Gallery router for any photo store implementation
pub fn gallery_router_generic<P, S>(store: P, sessions: S, config: GalleryConfig) -> Router
where
    P: PhotoStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let state = GalleryAppState {
        store: Arc::new(store),
        sessions: Arc::new(sessions),
        config: Arc::new(config),
    };

    let gallery_pages = Router::new()
        .route("/", get(handlers::gallery_page::<P, S>))
        .route("/photos", get(handlers::gallery_page::<P, S>))
        .route_layer(from_fn(require_authenticated));

    Router::new()
        .route("/photos", post(handlers::create_photo::<P, S>))
        .route("/photos/new", get(handlers::new_photo_page::<P, S>))
        .route("/photos/{id}", delete(handlers::delete_photo::<P, S>))
        .merge(gallery_pages)
        .with_state(state)
}
