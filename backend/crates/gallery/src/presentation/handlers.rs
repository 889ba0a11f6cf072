//! HTTP Handlers
//!
//! Gallery routes. Upload field names follow the original form:
//! `photo[file]` for the image and `photo[username]` for the display
//! name.

use axum::Json;
use axum::extract::{Extension, Multipart, Path, State};
use axum::response::Redirect;
use std::sync::Arc;

use auth::AuthError;
use auth::domain::entity::session::Flash;
use auth::domain::repository::SessionRepository;
use auth::presentation::middleware::CurrentSession;
use bytes::Bytes;

use crate::application::config::GalleryConfig;
use crate::application::{ListPhotosUseCase, RemovePhotoUseCase, UploadPhotoUseCase};
use crate::domain::photo::PhotoUpload;
use crate::domain::store::PhotoStore;
use crate::error::{GalleryError, GalleryResult};
use crate::presentation::dto::{GalleryPage, NewPhotoPage};

/// Shared state for gallery handlers
#[derive(Clone)]
pub struct GalleryAppState<P, S>
where
    P: PhotoStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub store: Arc<P>,
    pub sessions: Arc<S>,
    pub config: Arc<GalleryConfig>,
}

// ============================================================================
// Gallery Listing
// ============================================================================

/// GET / and GET /photos
pub async fn gallery_page<P, S>(
    State(state): State<GalleryAppState<P, S>>,
    Extension(current): Extension<CurrentSession>,
) -> GalleryResult<Json<GalleryPage>>
where
    P: PhotoStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    // Behind the authenticated guard, so the user is always present
    let user = current
        .current_user()
        .ok_or(AuthError::SessionInvalid)?;

    let use_case = ListPhotosUseCase::new(state.store.clone(), state.config.storage_timeout);
    let photos = use_case.execute().await?;

    let flash = state
        .sessions
        .take_flash(current.session_id)
        .await?;

    Ok(Json(GalleryPage {
        app_name: kernel::APP_NAME,
        current_user: user.email.clone(),
        photos,
        flash: flash.map(Into::into),
    }))
}

// ============================================================================
// Photo Upload
// ============================================================================

/// GET /photos/new
pub async fn new_photo_page<P, S>(
    State(state): State<GalleryAppState<P, S>>,
    Extension(current): Extension<CurrentSession>,
) -> GalleryResult<Json<NewPhotoPage>>
where
    P: PhotoStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let flash = state
        .sessions
        .take_flash(current.session_id)
        .await?;

    Ok(Json(NewPhotoPage {
        app_name: kernel::APP_NAME,
        flash: flash.map(Into::into),
    }))
}

/// POST /photos
pub async fn create_photo<P, S>(
    State(state): State<GalleryAppState<P, S>>,
    Extension(current): Extension<CurrentSession>,
    mut multipart: Multipart,
) -> GalleryResult<Redirect>
where
    P: PhotoStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let mut file: Option<(Bytes, String, String)> = None;
    let mut username: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GalleryError::InvalidPayload(e.to_string()))?
    {
        match field.name() {
            Some("photo[file]") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or(GalleryError::MissingField("filename"))?;
                let mimetype = field
                    .content_type()
                    .map(str::to_string)
                    .ok_or(GalleryError::MissingField("content type"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| GalleryError::InvalidPayload(e.to_string()))?;
                file = Some((data, name, mimetype));
            }
            Some("photo[username]") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| GalleryError::InvalidPayload(e.to_string()))?;
                username = Some(value);
            }
            _ => {}
        }
    }

    let (data, name, mimetype) = file.ok_or(GalleryError::MissingField("photo[file]"))?;
    if data.is_empty() {
        return Err(GalleryError::MissingField("photo[file]"));
    }

    let username = username
        .filter(|u| !u.trim().is_empty())
        .ok_or(GalleryError::MissingField("photo[username]"))?;

    let use_case = UploadPhotoUseCase::new(state.store.clone(), state.config.storage_timeout);
    use_case
        .execute(PhotoUpload::new(data, name, mimetype, username))
        .await?;

    state
        .sessions
        .set_flash(current.session_id, &Flash::success("Photo created!"))
        .await?;

    Ok(Redirect::to("/photos"))
}

// ============================================================================
// Photo Removal
// ============================================================================

/// DELETE /photos/{id}
pub async fn delete_photo<P, S>(
    State(state): State<GalleryAppState<P, S>>,
    Path(id): Path<String>,
) -> GalleryResult<Redirect>
where
    P: PhotoStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = RemovePhotoUseCase::new(state.store.clone(), state.config.storage_timeout);
    use_case.execute(&id).await?;

    Ok(Redirect::to("/photos"))
}
