//! List Photos Use Case

use std::sync::Arc;
use std::time::Duration;

use crate::domain::photo::StoredPhoto;
use crate::domain::store::PhotoStore;
use crate::error::{GalleryError, GalleryResult};

/// List photos use case
pub struct ListPhotosUseCase<P>
where
    P: PhotoStore,
{
    store: Arc<P>,
    timeout: Duration,
}

impl<P> ListPhotosUseCase<P>
where
    P: PhotoStore,
{
    pub fn new(store: Arc<P>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn execute(&self) -> GalleryResult<Vec<StoredPhoto>> {
        tokio::time::timeout(self.timeout, self.store.list())
            .await
            .map_err(|_| GalleryError::StorageTimeout)?
    }
}
