//! Leavedesk domain core.
//!
//! Pure vacation-request logic with zero internal deps so it can be used
//! by the API/repository layer and any future worker or CLI tooling:
//! period algebra, the request lifecycle state machine, conflict
//! detection, and allowance-ledger arithmetic.

pub mod actor;
pub mod conflict;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod period;
pub mod types;
