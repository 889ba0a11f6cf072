//! Gallery Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Gallery-specific result type alias
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Gallery-specific error variants
#[derive(Debug, Error)]
pub enum GalleryError {
    /// A required upload field is absent or empty
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The multipart payload could not be read
    #[error("Invalid upload payload: {0}")]
    InvalidPayload(String),

    /// The storage service failed or returned an error status
    #[error("Storage error: {0}")]
    Storage(String),

    /// The storage service did not answer within the deadline
    #[error("Storage timed out")]
    StorageTimeout,

    /// Session state failure from the auth layer
    #[error(transparent)]
    Auth(#[from] auth::AuthError),
}

impl GalleryError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GalleryError::MissingField(_) | GalleryError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            GalleryError::Storage(_) => StatusCode::BAD_GATEWAY,
            GalleryError::StorageTimeout => StatusCode::GATEWAY_TIMEOUT,
            GalleryError::Auth(e) => e.status_code(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GalleryError::MissingField(_) | GalleryError::InvalidPayload(_) => {
                ErrorKind::BadRequest
            }
            GalleryError::Storage(_) => ErrorKind::BadGateway,
            GalleryError::StorageTimeout => ErrorKind::GatewayTimeout,
            GalleryError::Auth(e) => e.kind(),
        }
    }

    /// Message safe to show to the end user
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::MissingField(field) => format!("Missing field: {}", field),
            GalleryError::InvalidPayload(_) => "Could not read the upload".to_string(),
            GalleryError::Storage(_) | GalleryError::StorageTimeout => {
                "Photo storage is unavailable, please try again".to_string()
            }
            GalleryError::Auth(e) => e.user_message(),
        }
    }

    fn log(&self) {
        match self {
            GalleryError::Storage(msg) => {
                tracing::error!(message = %msg, "Photo storage error");
            }
            GalleryError::StorageTimeout => {
                tracing::error!("Photo storage timed out");
            }
            GalleryError::Auth(e) => {
                tracing::error!(error = %e, "Session failure in gallery");
            }
            _ => {
                tracing::debug!(error = %self, "Gallery error");
            }
        }
    }
}

impl From<reqwest::Error> for GalleryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GalleryError::StorageTimeout
        } else {
            GalleryError::Storage(err.to_string())
        }
    }
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        self.log();
        AppError::new(self.kind(), self.user_message()).into_response()
    }
}
