//! Photo Types
//!
//! Photo bytes pass through this process exactly once, on upload; the
//! storage service keeps everything else.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A photo submitted for upload
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Raw image bytes from the multipart field
    pub data: Bytes,
    /// Original filename as submitted by the browser
    pub name: String,
    /// Declared content type of the file
    pub mimetype: String,
    /// Uploader-supplied display name
    pub username: String,
    /// Upload timestamp, stamped server-side
    pub date_created: DateTime<Utc>,
}

impl PhotoUpload {
    pub fn new(data: Bytes, name: String, mimetype: String, username: String) -> Self {
        Self {
            data,
            name,
            mimetype,
            username,
            date_created: Utc::now(),
        }
    }
}

/// A photo as known to the storage service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPhoto {
    /// Storage-assigned identifier
    pub id: String,
    pub name: String,
    pub mimetype: String,
    pub username: String,
    pub date_created: DateTime<Utc>,
}
