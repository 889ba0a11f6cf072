//! Upload Photo Use Case

use std::sync::Arc;
use std::time::Duration;

use crate::domain::photo::{PhotoUpload, StoredPhoto};
use crate::domain::store::PhotoStore;
use crate::error::{GalleryError, GalleryResult};

/// Upload photo use case
pub struct UploadPhotoUseCase<P>
where
    P: PhotoStore,
{
    store: Arc<P>,
    timeout: Duration,
}

impl<P> UploadPhotoUseCase<P>
where
    P: PhotoStore,
{
    pub fn new(store: Arc<P>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Hand the photo to the storage service, once, under a deadline.
    ///
    /// No retries: a slow or failed call surfaces as an error and the
    /// user resubmits.
    pub async fn execute(&self, upload: PhotoUpload) -> GalleryResult<StoredPhoto> {
        let stored = tokio::time::timeout(self.timeout, self.store.upload(&upload))
            .await
            .map_err(|_| GalleryError::StorageTimeout)??;

        tracing::info!(
            photo_id = %stored.id,
            name = %upload.name,
            username = %upload.username,
            size = upload.data.len(),
            "Photo uploaded"
        );

        Ok(stored)
    }
}
