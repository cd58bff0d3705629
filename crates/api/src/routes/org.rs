//! Route definitions for the `/org` fact views.

use axum::routing::get;
use axum::Router;

use crate::handlers::org;
use crate::state::AppState;

/// Routes mounted at `/org`.
///
/// ```text
/// GET /approvers/{id}/scope -> get_scope
/// GET /employees/{id}/unit  -> get_unit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/approvers/{id}/scope", get(org::get_scope))
        .route("/employees/{id}/unit", get(org::get_unit))
}
