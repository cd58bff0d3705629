//! Read-only views of the external org facts.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use leavedesk_core::types::DbId;
use leavedesk_db::repositories::ScopeRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScopePayload {
    pub approver_id: DbId,
    pub employee_ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct UnitPayload {
    pub employee_id: DbId,
    pub unit_id: Option<DbId>,
}

/// GET /api/v1/org/approvers/{id}/scope
///
/// The employee ids an approver may see and act upon.
pub async fn get_scope(
    State(state): State<AppState>,
    Path(approver_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let employee_ids = ScopeRepo::resolve_visibility_scope(&state.pool, approver_id).await?;
    Ok(Json(DataResponse {
        data: ScopePayload {
            approver_id,
            employee_ids,
        },
    }))
}

/// GET /api/v1/org/employees/{id}/unit
///
/// Which unit an employee belongs to. Informational only.
pub async fn get_unit(
    State(state): State<AppState>,
    Path(employee_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let unit_id = ScopeRepo::unit_of(&state.pool, employee_id).await?;
    Ok(Json(DataResponse {
        data: UnitPayload {
            employee_id,
            unit_id,
        },
    }))
}
