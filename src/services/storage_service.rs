use aws_sdk_s3 as s3;

use crate::config::StorageConfig;

/// Equipment image bucket on the managed backend's S3-compatible storage.
#[derive(Clone)]
pub struct ImageStorage {
    client: s3::Client,
    bucket: String,
    public_prefix: String,
}

impl ImageStorage {
    pub fn new(client: s3::Client, config: &StorageConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            public_prefix: format!(
                "{}/{}/",
                config.public_base_url.trim_end_matches('/'),
                config.bucket
            ),
        }
    }

    pub fn object_key(&self, image_url: &str) -> Option<String> {
        object_key_from_url(&self.public_prefix, image_url)
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), s3::Error> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;

        Ok(())
    }

    /// Deletes each image independently; failures are logged and skipped.
    /// Returns how many objects were removed.
    pub async fn delete_images(&self, image_urls: &[String]) -> usize {
        let mut deleted = 0;

        for url in image_urls {
            let Some(key) = self.object_key(url) else {
                tracing::warn!("Skipping image outside bucket {}: {}", self.bucket, url);
                continue;
            };

            match self.delete_object(&key).await {
                Ok(()) => deleted += 1,
                Err(e) => tracing::warn!("Failed to delete image {}: {}", key, e),
            }
        }

        if deleted > 0 {
            tracing::info!("Deleted {} image(s) from bucket {}", deleted, self.bucket);
        }

        deleted
    }
}

/// Object key for a public bucket URL; bare relative keys pass through.
pub fn object_key_from_url(public_prefix: &str, image_url: &str) -> Option<String> {
    let without_query = image_url.split(['?', '#']).next().unwrap_or_default().trim();

    let key = if let Some(key) = without_query.strip_prefix(public_prefix) {
        key
    } else if without_query.contains("://") {
        return None;
    } else {
        without_query.trim_start_matches('/')
    };

    (!key.is_empty()).then(|| key.to_string())
}
