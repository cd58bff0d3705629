//! Allowance ledger models.

use leavedesk_core::ledger::LimitSummary;
use leavedesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `leave_limits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LimitRecord {
    pub id: DbId,
    pub owner_id: DbId,
    pub year: i32,
    pub total_days: i32,
    pub committed_days: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LimitRecord {
    /// The core arithmetic view of this record.
    pub fn summary(&self) -> LimitSummary {
        LimitSummary {
            total_days: self.total_days,
            committed_days: self.committed_days,
        }
    }
}
