//! Route definitions for the `/limits` allowance resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::limits;
use crate::state::AppState;

/// Routes mounted at `/limits`.
///
/// ```text
/// GET /{owner_id}/{year}  -> get_limit
/// PUT /{owner_id}/{year}  -> set_allowance (administrative)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{owner_id}/{year}",
        get(limits::get_limit).put(limits::set_allowance),
    )
}
