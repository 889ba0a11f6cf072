//! Remove Photo Use Case

use std::sync::Arc;
use std::time::Duration;

use crate::domain::store::PhotoStore;
use crate::error::{GalleryError, GalleryResult};

/// Remove photo use case
pub struct RemovePhotoUseCase<P>
where
    P: PhotoStore,
{
    store: Arc<P>,
    timeout: Duration,
}

impl<P> RemovePhotoUseCase<P>
where
    P: PhotoStore,
{
    pub fn new(store: Arc<P>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn execute(&self, id: &str) -> GalleryResult<()> {
        tokio::time::timeout(self.timeout, self.store.remove(id))
            .await
            .map_err(|_| GalleryError::StorageTimeout)??;

        tracing::info!(photo_id = %id, "Photo removed");

        Ok(())
    }
}
