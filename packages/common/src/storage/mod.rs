mod error;
mod traits;
mod url;

pub mod filesystem;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use traits::ObjectStore;
pub use url::{key_for_url, public_url};
