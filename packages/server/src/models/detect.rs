use serde::Serialize;
use uuid::Uuid;

/// Result of a successful detection.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DetectResponse {
    #[schema(example = "Success")]
    pub message: String,
    /// The record ID when one plate was found, otherwise `?items=<id>,<id>,...`.
    #[schema(example = "0190f5a4-3b7e-7c1a-9d2e-5f6a7b8c9d0e")]
    pub redirect: String,
    /// Created record IDs in detection order.
    pub items: Vec<Uuid>,
}
