use log::{info, warn};
use shared::{MediaCategory, MediaImage};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::fixtures;
use crate::domain::models::validation::{is_http_url, ValidationErrors};
use crate::domain::models::{CollectionError, CollectionResult};
use crate::storage::DocumentStorage;

/// Shown wherever an image URL is missing
pub const PLACEHOLDER_IMAGE: &str = "https://ik.imagekit.io/placeholder.jpg";

/// Service for the media library: named CDN image URLs grouped by site section
#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn DocumentStorage<Vec<MediaCategory>>>,
    write_lock: Arc<Mutex<()>>,
}

impl MediaService {
    pub fn new(storage: Arc<dyn DocumentStorage<Vec<MediaCategory>>>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Stored library, or the default library when nothing was saved yet
    pub async fn list(&self) -> CollectionResult<Vec<MediaCategory>> {
        Ok(self.storage.load().await?.unwrap_or_else(fixtures::media_library))
    }

    pub async fn update_image_url(&self, category_id: &str, image_id: &str, url: &str) -> CollectionResult<MediaImage> {
        let url = url.trim();
        if !is_http_url(url) {
            let mut errors = ValidationErrors::new();
            errors.add("url", "must be an http(s) URL");
            warn!("Rejected media URL for {}/{}: {}", category_id, image_id, url);
            return Err(CollectionError::Validation(errors));
        }

        let _guard = self.write_lock.lock().await;
        let mut library = self.list().await?;

        let category = library
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| CollectionError::not_found("media category", category_id))?;
        let image = category
            .images
            .iter_mut()
            .find(|i| i.id == image_id)
            .ok_or_else(|| CollectionError::not_found("image", image_id))?;
        image.url = url.to_string();
        let updated = image.clone();

        self.storage.save(&library).await?;
        info!("Updated image {}/{}", category_id, image_id);
        Ok(updated)
    }
}

/// The URL itself, or the placeholder when it is blank
pub fn resolve(url: &str) -> &str {
    if url.trim().is_empty() {
        PLACEHOLDER_IMAGE
    } else {
        url
    }
}
