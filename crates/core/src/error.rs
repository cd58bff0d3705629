use crate::conflict::ConflictRecord;
use crate::lifecycle::{LifecycleEvent, RequestStatus};
use crate::types::DbId;

/// Domain error taxonomy.
///
/// Every variant carries enough structured data for the transport layer
/// to render a meaningful message without re-querying; nothing here ever
/// partially commits.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid transition: {event} is not legal from {from}")]
    InvalidTransition {
        from: RequestStatus,
        event: LifecycleEvent,
    },

    #[error("Insufficient allowance: requested {requested} days, {available} available")]
    InsufficientAllowance { requested: i32, available: i32 },

    #[error("Approval blocked by {} conflicting approved period(s)", .0.len())]
    Conflict(Vec<ConflictRecord>),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
