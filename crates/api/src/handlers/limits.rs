//! Handlers for the `/limits` allowance resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use leavedesk_core::types::DbId;
use leavedesk_db::repositories::LimitRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Caller-facing view of a ledger record.
#[derive(Debug, Serialize)]
pub struct LimitPayload {
    pub owner_id: DbId,
    pub year: i32,
    pub total_days: i32,
    pub committed_days: i32,
    pub available_days: i32,
}

/// Request body for `PUT /limits/{owner_id}/{year}`.
#[derive(Debug, Deserialize)]
pub struct SetAllowanceBody {
    pub total_days: i32,
}

/// GET /api/v1/limits/{owner_id}/{year}
///
/// The ledger view for an employee and year. An owner with no record
/// yet reads as an all-zero ledger; the row is only created when
/// something references it.
pub async fn get_limit(
    State(state): State<AppState>,
    Path((owner_id, year)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let payload = match LimitRepo::find(&state.pool, owner_id, year).await? {
        Some(record) => LimitPayload {
            owner_id,
            year,
            total_days: record.total_days,
            committed_days: record.committed_days,
            available_days: record.summary().available_days(),
        },
        None => LimitPayload {
            owner_id,
            year,
            total_days: 0,
            committed_days: 0,
            available_days: 0,
        },
    };
    Ok(Json(DataResponse { data: payload }))
}

/// PUT /api/v1/limits/{owner_id}/{year}
///
/// Administrative: set the total allowance. Never touches the committed
/// tally.
pub async fn set_allowance(
    State(state): State<AppState>,
    Path((owner_id, year)): Path<(DbId, i32)>,
    Json(body): Json<SetAllowanceBody>,
) -> AppResult<impl IntoResponse> {
    if body.total_days < 0 {
        return Err(AppError::BadRequest(
            "total_days must be non-negative".to_string(),
        ));
    }

    let record = LimitRepo::set_allowance(&state.pool, owner_id, year, body.total_days).await?;
    tracing::info!(owner_id, year, total_days = body.total_days, "Allowance set");

    Ok(Json(DataResponse {
        data: LimitPayload {
            owner_id,
            year,
            total_days: record.total_days,
            committed_days: record.committed_days,
            available_days: record.summary().available_days(),
        },
    }))
}
