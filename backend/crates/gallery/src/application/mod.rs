//! Application Layer - Use Cases

pub mod config;
pub mod list_photos;
pub mod remove_photo;
pub mod upload_photo;

pub use list_photos::ListPhotosUseCase;
pub use remove_photo::RemovePhotoUseCase;
pub use upload_photo::UploadPhotoUseCase;
