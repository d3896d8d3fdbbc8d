use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use serde::Deserialize;
use tracing::debug;

use super::error::StorageError;
use super::traits::ObjectStore;
use super::url::{key_for_url, public_url, validate_key};

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Region name, e.g. "us-east-1".
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, GCS interop, R2).
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Base URL under which objects are publicly readable.
    pub public_base_url: String,
    /// Use path-style addressing (`endpoint/bucket/key`).
    #[serde(default)]
    pub path_style: bool,
}

/// S3-backed object store.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base: String,
}

impl S3ObjectStore {
    pub fn new(config: &S3Config) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_base: config.public_base_url.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_key(key)?;

        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Backend(format!(
                "upload of {key} returned status {status}"
            )));
        }

        debug!(key, size = data.len(), "Uploaded object");
        Ok(public_url(&self.public_base, key))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = key_for_url(&self.public_base, url)?;

        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let status = response.status_code();
        // S3 answers 204 for both existing and absent keys; some backends use 404.
        if (200..300).contains(&status) || status == 404 {
            debug!(key, "Deleted object");
            Ok(())
        } else {
            Err(StorageError::Backend(format!(
                "delete of {key} returned status {status}"
            )))
        }
    }
}
