use async_trait::async_trait;

use super::error::StorageError;

/// Key-addressed object storage that hands out publicly dereferenceable URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` and return the object's public URL.
    ///
    /// Uploading to an existing key replaces the previous object.
    async fn upload(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Delete the object behind a URL previously returned by [`upload`].
    ///
    /// Fails with [`StorageError::NotFound`] when the URL does not belong to
    /// this store. Deleting an object that is already gone succeeds.
    ///
    /// [`upload`]: ObjectStore::upload
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}
