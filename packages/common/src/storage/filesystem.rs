use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::error::StorageError;
use super::traits::ObjectStore;
use super::url::{key_for_url, public_url, validate_key};

/// Filesystem-backed object store.
///
/// Objects live flat under `base_path`; the public URL is `public_base/{key}`,
/// so something else (a static file server or CDN) must serve `base_path`.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
    public_base: String,
    max_size: u64,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(
        base_path: PathBuf,
        public_base: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_base: public_base.into(),
            max_size,
        })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        key: &str,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        validate_key(key)?;
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, &data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, self.object_path(key)).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(key, size = data.len(), "Stored object");
        Ok(public_url(&self.public_base, key))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = key_for_url(&self.public_base, url)?;
        validate_key(key).map_err(|_| StorageError::NotFound(url.to_string()))?;

        match fs::remove_file(self.object_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
