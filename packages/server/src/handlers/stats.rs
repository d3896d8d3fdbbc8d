use axum::{Json, extract::State};
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::SessionUser;
use crate::models::stats::TotalResponse;
use crate::services::stats::{self, Buckets};
use crate::state::AppState;

/// Count the caller's plate records.
#[utoipa::path(
    get,
    path = "/get-total-vehicle",
    tag = "Statistics",
    operation_id = "getTotalVehicles",
    summary = "Total plate records",
    responses(
        (status = 200, description = "Record count", body = TotalResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn total(
    user: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<TotalResponse>, AppError> {
    let total = stats::total(&*state.records, &user.user_id).await?;
    Ok(Json(TotalResponse { total }))
}

/// Most frequent regions among the caller's records.
#[utoipa::path(
    get,
    path = "/get-total-vehicle-per-region",
    tag = "Statistics",
    operation_id = "getTotalVehiclesPerRegion",
    summary = "Top regions",
    description = "Up to five regions, most frequent first. Equal counts keep the order in which \
        the regions were first detected.",
    responses(
        (status = 200, description = "Region to count, ordered", body = std::collections::HashMap<String, u64>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn per_region(
    user: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Buckets>, AppError> {
    Ok(Json(stats::per_region(&*state.records, &user.user_id).await?))
}

/// Records per day over the last seven days.
#[utoipa::path(
    get,
    path = "/get-total-vehicle-daily",
    tag = "Statistics",
    operation_id = "getTotalVehiclesDaily",
    summary = "Daily counts",
    description = "Seven entries keyed by weekday name, oldest day first, ending today.",
    responses(
        (status = 200, description = "Weekday to count, ordered", body = std::collections::HashMap<String, u64>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn daily(
    user: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Buckets>, AppError> {
    let offset = state.config.stats.offset();
    Ok(Json(
        stats::daily(&*state.records, &user.user_id, Utc::now(), offset).await?,
    ))
}

/// Records per month over the last five months.
#[utoipa::path(
    get,
    path = "/get-total-vehicle-monthly",
    tag = "Statistics",
    operation_id = "getTotalVehiclesMonthly",
    summary = "Monthly counts",
    description = "Five entries keyed by month name, oldest month first, ending with the current month.",
    responses(
        (status = 200, description = "Month to count, ordered", body = std::collections::HashMap<String, u64>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn monthly(
    user: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Buckets>, AppError> {
    let offset = state.config.stats.offset();
    Ok(Json(
        stats::monthly(&*state.records, &user.user_id, Utc::now(), offset).await?,
    ))
}
