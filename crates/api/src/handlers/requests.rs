//! Handlers for the `/requests` resource.
//!
//! Every mutating endpoint carries an explicit `actor_id`; the service
//! layer resolves the actor's visibility scope from the external org
//! facts. Authentication itself is the presentation layer's concern —
//! actors arrive pre-validated.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use leavedesk_core::error::CoreError;
use leavedesk_core::lifecycle::RequestStatus;
use leavedesk_core::period::PeriodInput;
use leavedesk_core::types::DbId;
use leavedesk_db::models::request::RequestFilter;
use leavedesk_db::repositories::{RequestRepo, ScopeRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::services::{self, approval, lifecycle};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Body / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /requests`.
#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub actor_id: DbId,
    pub owner_id: DbId,
    pub year: i32,
    pub periods: Vec<PeriodInput>,
    pub comment: Option<String>,
}

/// Request body for `PUT /requests/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateRequestBody {
    pub actor_id: DbId,
    pub periods: Vec<PeriodInput>,
    pub comment: Option<String>,
}

/// Request body for endpoints that only need the acting caller.
#[derive(Debug, Deserialize)]
pub struct ActorBody {
    pub actor_id: DbId,
}

/// Request body for `POST /requests/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub actor_id: DbId,
    /// Approve despite conflicts. The overridden conflicts come back as
    /// `warnings`.
    #[serde(default)]
    pub force: bool,
}

/// Request body for `POST /requests/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectBody {
    pub actor_id: DbId,
    /// May be empty; recorded verbatim.
    #[serde(default)]
    pub reason: String,
}

/// Query parameters for `GET /requests`.
///
/// Exactly one of `owner_id` (own requests, Drafts included) or
/// `approver_id` (everyone in the approver's scope, Drafts excluded)
/// must be given.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub owner_id: Option<DbId>,
    pub approver_id: Option<DbId>,
    pub year: Option<i32>,
    pub status: Option<RequestStatus>,
}

/// Query parameters for `DELETE /requests/{id}`.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub actor_id: DbId,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/requests
///
/// Create a Draft request. Returns 201 with the stored request.
pub async fn create_request(
    State(state): State<AppState>,
    Json(body): Json<CreateRequestBody>,
) -> AppResult<impl IntoResponse> {
    let actor = services::resolve_actor(&state.pool, body.actor_id).await?;
    let created = lifecycle::create(
        &state.pool,
        &actor,
        body.owner_id,
        body.year,
        &body.periods,
        body.comment,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/requests
///
/// List requests for an owner or for an approver's visibility scope.
pub async fn list_requests(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = RequestFilter {
        year: params.year,
        status: params.status.map(|s| s.id()),
    };

    let requests = match (params.owner_id, params.approver_id) {
        (Some(owner_id), None) => {
            RequestRepo::list_by_owner(&state.pool, owner_id, &filter).await?
        }
        (None, Some(approver_id)) => {
            let scope = ScopeRepo::resolve_visibility_scope(&state.pool, approver_id).await?;
            RequestRepo::list_by_scope(&state.pool, &scope, &filter).await?
        }
        _ => {
            return Err(AppError::BadRequest(
                "Provide exactly one of owner_id or approver_id".to_string(),
            ))
        }
    };

    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = RequestRepo::find_with_periods(&state.pool, request_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "VacationRequest",
            id: request_id,
        })?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/requests/{id}
///
/// Replace a Draft request's periods and comment. Owner only.
pub async fn update_request(
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Json(body): Json<UpdateRequestBody>,
) -> AppResult<impl IntoResponse> {
    let actor = services::resolve_actor(&state.pool, body.actor_id).await?;
    let updated =
        lifecycle::edit(&state.pool, &actor, request_id, &body.periods, body.comment).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/requests/{id}?actor_id=...
///
/// Delete a Draft outright. Returns 204 No Content.
pub async fn delete_request(
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Query(params): Query<DeleteQuery>,
) -> AppResult<impl IntoResponse> {
    let actor = services::resolve_actor(&state.pool, params.actor_id).await?;
    lifecycle::delete(&state.pool, &actor, request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/requests/{id}/submit
///
/// Draft -> Pending; reserves the request's days against the allowance.
pub async fn submit_request(
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Json(body): Json<ActorBody>,
) -> AppResult<impl IntoResponse> {
    let actor = services::resolve_actor(&state.pool, body.actor_id).await?;
    let submitted = lifecycle::submit(&state.pool, &actor, request_id).await?;
    Ok(Json(DataResponse { data: submitted }))
}

/// POST /api/v1/requests/{id}/approve
///
/// Pending -> Approved. Without `force`, conflicting approved leave in
/// the approver's scope fails with 409 and the full conflict list; with
/// `force`, succeeds and returns the overridden conflicts as `warnings`.
pub async fn approve_request(
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Json(body): Json<ApproveBody>,
) -> AppResult<impl IntoResponse> {
    let actor = services::resolve_actor(&state.pool, body.actor_id).await?;
    let outcome = approval::approve(&state.pool, &actor, request_id, body.force).await?;
    Ok(Json(serde_json::json!({
        "data": outcome.request,
        "warnings": outcome.warnings,
    })))
}

/// POST /api/v1/requests/{id}/reject
///
/// Pending -> Rejected; releases the reservation.
pub async fn reject_request(
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Json(body): Json<RejectBody>,
) -> AppResult<impl IntoResponse> {
    let actor = services::resolve_actor(&state.pool, body.actor_id).await?;
    let rejected = approval::reject(&state.pool, &actor, request_id, &body.reason).await?;
    Ok(Json(DataResponse { data: rejected }))
}

/// POST /api/v1/requests/{id}/cancel
///
/// Pending/Approved -> Cancelled; releases the reservation. Owner or
/// approver with scope.
pub async fn cancel_request(
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Json(body): Json<ActorBody>,
) -> AppResult<impl IntoResponse> {
    let actor = services::resolve_actor(&state.pool, body.actor_id).await?;
    let cancelled = approval::cancel(&state.pool, &actor, request_id).await?;
    Ok(Json(DataResponse { data: cancelled }))
}
