use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::identity::IdentityError;
use crate::prediction::PredictionError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NO_IMAGE`,
    /// `NO_PLATE_DETECTED`, `TOKEN_MISSING`, `TOKEN_INVALID`, `INVALID_ID_TOKEN`,
    /// `PERMISSION_DENIED`, `NOT_FOUND`, `UPSTREAM_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "NO_PLATE_DETECTED")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "No plate detected")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// The detect request carried no image bytes.
    NoImageProvided,
    /// The prediction service found no plate in the image.
    NoDetection,
    TokenMissing,
    TokenInvalid,
    /// The identity provider's ID token failed verification.
    InvalidCredential,
    PermissionDenied,
    NotFound(String),
    /// Record store, object store or prediction service failure.
    Upstream(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NoImageProvided => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "NO_IMAGE",
                    message: "No image uploaded".into(),
                },
            ),
            AppError::NoDetection => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "NO_PLATE_DETECTED",
                    message: "No plate detected".into(),
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Unauthorized: Missing or invalid token".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired session".into(),
                },
            ),
            AppError::InvalidCredential => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_ID_TOKEN",
                    message: "Invalid ID token".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "You do not have permission to access this resource.".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Upstream(detail) => {
                tracing::error!("Upstream error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "UPSTREAM_ERROR",
                        message: "Internal Server Error".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "Internal Server Error".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Invalid(reason) => {
                tracing::debug!("ID token rejected: {reason}");
                AppError::InvalidCredential
            }
            IdentityError::Unavailable(detail) => AppError::Upstream(detail),
        }
    }
}
