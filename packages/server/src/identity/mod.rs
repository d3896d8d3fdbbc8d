//! Verification of ID tokens issued by the external identity provider.

mod google;

use async_trait::async_trait;

pub use google::{GoogleIdentityProvider, GoogleIdentityConfig};

/// Identity claims extracted from a verified ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Stable subject identifier; becomes the user ID.
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub picture_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The token is malformed, expired, wrongly signed or issued to someone else.
    #[error("invalid ID token: {0}")]
    Invalid(String),
    /// The provider's signing keys could not be obtained.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_credential(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}
