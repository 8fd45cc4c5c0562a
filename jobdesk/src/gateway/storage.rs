//! Object storage uploads.
//!
//! Files are written under a generated unique path and exposed through the
//! bucket's public URL. There is no retry and no resumable upload; a failed
//! upload is reported once and the caller retries explicitly.

use super::{Gateway, ObjectStore};
use crate::errors::{GatewayOperation, Result};
use bytes::Bytes;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Storage handle bound to a single bucket.
#[derive(Clone)]
pub struct BucketStore {
    gateway: Gateway,
    bucket: String,
}

impl BucketStore {
    pub fn new(gateway: Gateway, bucket: impl Into<String>) -> Self {
        Self {
            gateway,
            bucket: bucket.into(),
        }
    }

    /// Public reference URL for an object in this bucket.
    pub fn public_url(&self, path: &str) -> Result<String> {
        Ok(self
            .gateway
            .endpoint(&format!("storage/v1/object/public/{}/{}", self.bucket, path))?
            .to_string())
    }
}

/// Generate a unique object path for an uploaded file: millisecond timestamp,
/// a random alphanumeric suffix, and the original extension.
pub fn generate_object_path(original_filename: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    let extension = std::path::Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    format!("{}-{}.{}", chrono::Utc::now().timestamp_millis(), suffix, extension)
}

#[async_trait::async_trait]
impl ObjectStore for BucketStore {
    async fn upload(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<String> {
        let url = self
            .gateway
            .endpoint(&format!("storage/v1/object/{}/{}", self.bucket, path))?;
        let response = self
            .gateway
            .http()
            .post(url)
            .header("apikey", self.gateway.api_key())
            .bearer_auth(self.gateway.api_key())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| Gateway::transport_error(self.bucket.clone(), e))?;
        Gateway::check(response, GatewayOperation::Upload, &self.bucket).await?;
        self.public_url(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_keeps_extension_and_is_unique() {
        let a = generate_object_path("logo.png");
        let b = generate_object_path("logo.png");
        assert!(a.ends_with(".png"));
        assert!(b.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn object_path_defaults_extension() {
        let path = generate_object_path("no-extension");
        assert!(path.ends_with(".bin"));
    }
}
