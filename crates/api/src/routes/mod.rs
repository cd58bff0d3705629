pub mod health;
pub mod limits;
pub mod org;
pub mod requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /requests                       create (POST), list (GET)
/// /requests/{id}                  get, update (PUT), delete (DELETE)
/// /requests/{id}/submit           submit for approval (POST)
/// /requests/{id}/approve          approve, optionally forced (POST)
/// /requests/{id}/reject           reject with reason (POST)
/// /requests/{id}/cancel           cancel (POST)
///
/// /limits/{owner_id}/{year}       ledger view (GET), set allowance (PUT)
///
/// /org/approvers/{id}/scope       visibility scope (GET)
/// /org/employees/{id}/unit        org unit, informational (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/requests", requests::router())
        .nest("/limits", limits::router())
        .nest("/org", org::router())
}
