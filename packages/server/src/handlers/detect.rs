use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::SessionUser;
use crate::models::detect::DetectResponse;
use crate::services::ingest::{self, IngestOutcome};
use crate::state::AppState;

/// Room for multipart framing on top of the image itself.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

pub fn detect_body_limit(max_upload_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)
}

/// Detect plates in an uploaded image and store one record per plate.
#[utoipa::path(
    post,
    path = "/detect",
    tag = "Detection",
    operation_id = "detectPlates",
    summary = "Detect license plates in an image",
    description = "Sends the `image` multipart field to the prediction service. Every detected \
        plate gets its annotated image uploaded and a record created. `redirect` is the record \
        ID for a single plate, or `?items=<id>,<id>,...` for several.",
    request_body(content_type = "multipart/form-data", description = "Image in the `image` field"),
    responses(
        (status = 200, description = "Plates stored", body = DetectResponse),
        (status = 400, description = "No image (NO_IMAGE) or no plate found (NO_PLATE_DETECTED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Prediction or storage failure (UPSTREAM_ERROR, INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, user, multipart), fields(user_id = %user.user_id))]
pub async fn detect(
    user: SessionUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectResponse>, AppError> {
    let Ok(mut multipart) = multipart else {
        return Err(AppError::NoImageProvided);
    };

    let mut image: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
            image = Some(bytes.to_vec());
        }
    }

    match ingest::ingest(&state.ingest_deps(), &user.user_id, image).await? {
        IngestOutcome::NoPlate => Err(AppError::NoDetection),
        IngestOutcome::Stored(ids) => Ok(Json(DetectResponse {
            message: "Success".into(),
            redirect: ingest::redirect_target(&ids),
            items: ids,
        })),
    }
}
