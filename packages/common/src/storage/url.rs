use super::error::StorageError;

/// Join a public base URL and an object key.
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Map a public URL back to the object key it was built from.
pub fn key_for_url<'a>(base: &str, url: &'a str) -> Result<&'a str, StorageError> {
    let prefix = base.trim_end_matches('/');
    url.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
        .ok_or_else(|| StorageError::NotFound(url.to_string()))
}

/// Reject keys that are empty or could escape a flat namespace.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key must not be empty".into()));
    }
    if key.contains('/') || key.contains('\\') || key == "." || key == ".." {
        return Err(StorageError::InvalidKey(format!(
            "key must be a flat name: {key}"
        )));
    }
    Ok(())
}
