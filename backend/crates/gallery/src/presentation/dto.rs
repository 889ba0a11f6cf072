//! API DTOs (Data Transfer Objects)
//!
//! Page contexts for the gallery routes; the shapes a template layer
//! would render.

use serde::Serialize;

use crate::domain::photo::StoredPhoto;

pub use auth::presentation::dto::FlashDto;

/// Gallery page context (`GET /` and `GET /photos`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPage {
    pub app_name: &'static str,
    /// Email of the logged-in user; the gallery is auth-only so this
    /// is always present
    pub current_user: String,
    pub photos: Vec<StoredPhoto>,
    pub flash: Option<FlashDto>,
}

/// Upload form page context (`GET /photos/new`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhotoPage {
    pub app_name: &'static str,
    pub flash: Option<FlashDto>,
}
