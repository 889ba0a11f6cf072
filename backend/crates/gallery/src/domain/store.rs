//! Photo Store Trait
//!
//! Interface to the external object-storage service. Implementation is
//! in the infrastructure layer.

use crate::domain::photo::{PhotoUpload, StoredPhoto};
use crate::error::GalleryResult;

/// Photo storage collaborator
#[trait_variant::make(PhotoStore: Send)]
pub trait LocalPhotoStore {
    /// Upload one photo. Called at most once per request; the caller
    /// never retries, so a failure leaves no partial state here.
    async fn upload(&self, photo: &PhotoUpload) -> GalleryResult<StoredPhoto>;

    /// Remove a photo by its storage id
    async fn remove(&self, id: &str) -> GalleryResult<()>;

    /// List all stored photos
    async fn list(&self) -> GalleryResult<Vec<StoredPhoto>>;
}
