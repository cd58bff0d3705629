//! Vacation request and period models.

use leavedesk_core::error::CoreError;
use leavedesk_core::lifecycle::{RequestStatus, StatusId};
use leavedesk_core::period::VacationPeriod;
use leavedesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `vacation_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VacationRequest {
    pub id: DbId,
    pub owner_id: DbId,
    pub year: i32,
    /// SMALLINT status id; see [`RequestStatus`].
    pub status: StatusId,
    pub comment: Option<String>,
    pub decided_by: Option<DbId>,
    pub decided_at: Option<Timestamp>,
    pub decision_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VacationRequest {
    /// Decode the SMALLINT status column.
    ///
    /// An unknown id means the row was written by something other than
    /// the lifecycle transactions, which is an internal fault.
    pub fn lifecycle_status(&self) -> Result<RequestStatus, CoreError> {
        RequestStatus::from_id(self.status).ok_or_else(|| {
            CoreError::Internal(format!(
                "Request {} has unknown status id {}",
                self.id, self.status
            ))
        })
    }
}

/// A row from the `vacation_periods` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VacationPeriodRow {
    pub id: DbId,
    pub request_id: DbId,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub day_count: i32,
}

impl From<&VacationPeriodRow> for VacationPeriod {
    fn from(row: &VacationPeriodRow) -> Self {
        VacationPeriod {
            start_date: row.start_date,
            end_date: row.end_date,
            day_count: row.day_count,
        }
    }
}

/// A request together with its periods, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct RequestWithPeriods {
    #[serde(flatten)]
    pub request: VacationRequest,
    pub periods: Vec<VacationPeriodRow>,
}

impl RequestWithPeriods {
    /// The periods as core domain values.
    pub fn core_periods(&self) -> Vec<VacationPeriod> {
        self.periods.iter().map(VacationPeriod::from).collect()
    }
}

/// DTO for inserting a new request with its validated periods.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub owner_id: DbId,
    pub year: i32,
    pub comment: Option<String>,
    pub periods: Vec<VacationPeriod>,
}

/// An approved period of some employee in a visibility scope, joined
/// with its owning request.
#[derive(Debug, Clone, FromRow)]
pub struct ApprovedScopedPeriod {
    pub request_id: DbId,
    pub owner_id: DbId,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

impl From<&ApprovedScopedPeriod> for leavedesk_core::conflict::ScopedPeriod {
    fn from(row: &ApprovedScopedPeriod) -> Self {
        Self {
            request_id: row.request_id,
            owner_id: row.owner_id,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

/// Listing filter for `RequestRepo::list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
    pub year: Option<i32>,
    pub status: Option<StatusId>,
}
