//! Gallery Backend Module
//!
//! Photo listing, upload, and removal backed by an external
//! object-storage HTTP service. Structure mirrors the auth crate:
//! - `domain/` - Photo types and the storage collaborator trait
//! - `application/` - Use cases wrapping storage calls in timeouts
//! - `infra/` - reqwest-based storage client
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Photo bytes are never persisted locally; the storage service is the
//! single owner of photo state.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::GalleryConfig;
pub use domain::photo::{PhotoUpload, StoredPhoto};
pub use domain::store::PhotoStore;
pub use error::{GalleryError, GalleryResult};
pub use infra::http::HttpPhotoStore;
pub use presentation::router::{gallery_router, gallery_router_generic};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::photo::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
