//! Route definitions for the `/requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// POST   /                -> create_request
/// GET    /                -> list_requests
/// GET    /{id}            -> get_request
/// PUT    /{id}            -> update_request
/// DELETE /{id}            -> delete_request
/// POST   /{id}/submit     -> submit_request
/// POST   /{id}/approve    -> approve_request
/// POST   /{id}/reject     -> reject_request
/// POST   /{id}/cancel     -> cancel_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(requests::create_request).get(requests::list_requests),
        )
        .route(
            "/{id}",
            get(requests::get_request)
                .put(requests::update_request)
                .delete(requests::delete_request),
        )
        .route("/{id}/submit", post(requests::submit_request))
        .route("/{id}/approve", post(requests::approve_request))
        .route("/{id}/reject", post(requests::reject_request))
        .route("/{id}/cancel", post(requests::cancel_request))
}
