use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::identity::VerifiedIdentity;

/// Request body for signing in with an identity-provider ID token.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// ID token obtained by the frontend from the identity provider.
    #[serde(rename = "idToken")]
    #[schema(example = "eyJhbGciOiJSUzI1NiIsImtpZCI6Ij...")]
    pub id_token: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.id_token.trim().is_empty() {
        return Err(AppError::Validation("idToken must not be empty".into()));
    }
    Ok(())
}

/// Public profile of the signed-in user.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice Liddell")]
    pub name: String,
    #[schema(example = "https://lh3.googleusercontent.com/a/photo.jpg")]
    pub picture: Option<String>,
}

impl From<VerifiedIdentity> for UserProfile {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            email: identity.email,
            name: identity.display_name,
            picture: identity.picture_url,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub user: UserProfile,
}

/// Plain acknowledgement.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logout successful")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
