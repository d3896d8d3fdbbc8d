use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::plate_record;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::SessionUser;
use crate::models::auth::MessageResponse;
use crate::models::vehicle::{VehicleDetail, VehicleListResponse, VehicleSummary};
use crate::state::AppState;

/// List the caller's plate records.
#[utoipa::path(
    get,
    path = "/get-list",
    tag = "Vehicles",
    operation_id = "listVehicles",
    summary = "List the caller's plate records",
    description = "Returns the caller's records in the order they were created. The owner field \
        is omitted. A `message` is included when the list is empty.",
    responses(
        (status = 200, description = "Caller's records", body = VehicleListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_list(
    user: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<VehicleListResponse>, AppError> {
    let records = state.records.list_owned(&user.user_id).await?;

    let message = records
        .is_empty()
        .then(|| "No plate data paths found".to_string());
    let data = records.into_iter().map(VehicleSummary::from).collect();

    Ok(Json(VehicleListResponse { message, data }))
}

/// Get one of the caller's plate records.
#[utoipa::path(
    get,
    path = "/get-vehicle-details/{id}",
    tag = "Vehicles",
    operation_id = "getVehicle",
    summary = "Get a plate record",
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record details", body = VehicleDetail),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by someone else (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No such record (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_detail(
    user: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleDetail>, AppError> {
    let record = find_owned(&state, &user, &id).await?;
    Ok(Json(record.into()))
}

/// Delete one of the caller's plate records together with its image.
#[utoipa::path(
    delete,
    path = "/get-vehicle-details/{id}",
    tag = "Vehicles",
    operation_id = "deleteVehicle",
    summary = "Delete a plate record",
    description = "Deletes the stored image first, then the record.",
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by someone else (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No such record (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn delete_detail(
    user: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let record = find_owned(&state, &user, &id).await?;

    state.objects.delete(&record.image_url).await?;
    state.records.delete_plate(&record).await?;
    info!(record_id = %record.id, "Deleted plate record");

    Ok(Json(MessageResponse::new(
        "Vehicle data deleted successfully.",
    )))
}

/// Fetch a record and check that the caller owns it.
async fn find_owned(
    state: &AppState,
    user: &SessionUser,
    id: &str,
) -> Result<plate_record::Model, AppError> {
    let not_found = || AppError::NotFound("Vehicle not found".into());

    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    let record = state.records.find_plate(id).await?.ok_or_else(not_found)?;

    if record.owner != user.user_id {
        return Err(AppError::PermissionDenied);
    }
    Ok(record)
}
