//! Application Configuration

use std::time::Duration;

/// Gallery application configuration
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Deadline for any single storage service call
    pub storage_timeout: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            storage_timeout: Duration::from_secs(30),
        }
    }
}

impl GalleryConfig {
    pub fn with_storage_timeout(storage_timeout: Duration) -> Self {
        Self { storage_timeout }
    }
}
