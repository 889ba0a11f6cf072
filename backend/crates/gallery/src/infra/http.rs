//! HTTP Photo Store
//!
//! reqwest client for the object-storage service's photo API:
//! `POST /photos` (multipart), `DELETE /photos/{id}`, `GET /photos`.

use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::domain::photo::{PhotoUpload, StoredPhoto};
use crate::domain::store::PhotoStore;
use crate::error::{GalleryError, GalleryResult};

/// Photo store backed by the external storage HTTP service
#[derive(Clone)]
pub struct HttpPhotoStore {
    client: Client,
    base_url: String,
}

impl HttpPhotoStore {
    /// `base_url` is the storage service root, without a trailing
    /// slash.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn photos_url(&self) -> String {
        format!("{}/photos", self.base_url)
    }

    async fn check(response: reqwest::Response) -> GalleryResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GalleryError::Storage(format!(
                "storage responded {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}

impl PhotoStore for HttpPhotoStore {
    async fn upload(&self, photo: &PhotoUpload) -> GalleryResult<StoredPhoto> {
        let file_part = Part::bytes(photo.data.to_vec())
            .file_name(photo.name.clone())
            .mime_str(&photo.mimetype)
            .map_err(|e| GalleryError::InvalidPayload(e.to_string()))?;

        let form = Form::new()
            .part("file", file_part)
            .text("username", photo.username.clone())
            .text("dateCreated", photo.date_created.to_rfc3339());

        let response = self
            .client
            .post(self.photos_url())
            .multipart(form)
            .send()
            .await?;

        let stored = Self::check(response).await?.json::<StoredPhoto>().await?;

        Ok(stored)
    }

    async fn remove(&self, id: &str) -> GalleryResult<()> {
        let response = self
            .client
            .delete(format!("{}/{}", self.photos_url(), id))
            .send()
            .await?;

        Self::check(response).await?;

        Ok(())
    }

    async fn list(&self) -> GalleryResult<Vec<StoredPhoto>> {
        let response = self.client.get(self.photos_url()).send().await?;

        let photos = Self::check(response)
            .await?
            .json::<Vec<StoredPhoto>>()
            .await?;

        Ok(photos)
    }
}
