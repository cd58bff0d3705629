//! Repository for the `vacation_requests` and `vacation_periods` tables.

use std::collections::HashMap;

use leavedesk_core::lifecycle::RequestStatus;
use leavedesk_core::period::VacationPeriod;
use leavedesk_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::request::{
    ApprovedScopedPeriod, CreateRequest, RequestFilter, RequestWithPeriods, VacationPeriodRow,
    VacationRequest,
};

const COLUMNS: &str = "\
    id, owner_id, year, status, comment, decided_by, decided_at, \
    decision_reason, created_at, updated_at";

const PERIOD_COLUMNS: &str = "id, request_id, start_date, end_date, day_count";

/// Durable storage of vacation requests and their periods.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a new Draft request with its periods, atomically.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRequest,
    ) -> Result<RequestWithPeriods, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO vacation_requests (owner_id, year, status, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, VacationRequest>(&query)
            .bind(input.owner_id)
            .bind(input.year)
            .bind(RequestStatus::Draft.id())
            .bind(&input.comment)
            .fetch_one(&mut *tx)
            .await?;

        let periods = insert_periods(&mut tx, request.id, &input.periods).await?;

        tx.commit().await?;
        Ok(RequestWithPeriods { request, periods })
    }

    /// Find a request and its periods.
    pub async fn find_with_periods(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RequestWithPeriods>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vacation_requests WHERE id = $1");
        let Some(request) = sqlx::query_as::<_, VacationRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let periods = sqlx::query_as::<_, VacationPeriodRow>(&format!(
            "SELECT {PERIOD_COLUMNS} FROM vacation_periods \
             WHERE request_id = $1 ORDER BY start_date"
        ))
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(RequestWithPeriods { request, periods }))
    }

    /// Lock a request row for the duration of the caller's transaction.
    ///
    /// This is the per-request mutual-exclusion region: at most one
    /// transition executes against a given request at a time.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<VacationRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vacation_requests WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, VacationRequest>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Periods of a request, inside a caller-owned transaction.
    pub async fn periods_for(
        conn: &mut PgConnection,
        request_id: DbId,
    ) -> Result<Vec<VacationPeriodRow>, sqlx::Error> {
        sqlx::query_as::<_, VacationPeriodRow>(&format!(
            "SELECT {PERIOD_COLUMNS} FROM vacation_periods \
             WHERE request_id = $1 ORDER BY start_date"
        ))
        .bind(request_id)
        .fetch_all(conn)
        .await
    }

    /// List one owner's requests, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        filter: &RequestFilter,
    ) -> Result<Vec<RequestWithPeriods>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vacation_requests \
             WHERE owner_id = $1 \
               AND ($2::int IS NULL OR year = $2) \
               AND ($3::smallint IS NULL OR status = $3) \
             ORDER BY created_at DESC, id DESC"
        );
        let requests = sqlx::query_as::<_, VacationRequest>(&query)
            .bind(owner_id)
            .bind(filter.year)
            .bind(filter.status)
            .fetch_all(pool)
            .await?;

        attach_periods(pool, requests).await
    }

    /// List requests of every employee in a visibility scope, newest
    /// first. Drafts are the owner's private state and are excluded.
    pub async fn list_by_scope(
        pool: &PgPool,
        employee_ids: &[DbId],
        filter: &RequestFilter,
    ) -> Result<Vec<RequestWithPeriods>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vacation_requests \
             WHERE owner_id = ANY($1) \
               AND status <> $2 \
               AND ($3::int IS NULL OR year = $3) \
               AND ($4::smallint IS NULL OR status = $4) \
             ORDER BY created_at DESC, id DESC"
        );
        let requests = sqlx::query_as::<_, VacationRequest>(&query)
            .bind(employee_ids)
            .bind(RequestStatus::Draft.id())
            .bind(filter.year)
            .bind(filter.status)
            .fetch_all(pool)
            .await?;

        attach_periods(pool, requests).await
    }

    /// Replace a Draft request's periods and comment, touching
    /// `updated_at`. Runs inside the caller's transaction; the caller
    /// has already locked the row and checked the status.
    pub async fn replace_periods(
        conn: &mut PgConnection,
        request_id: DbId,
        periods: &[VacationPeriod],
        comment: Option<&str>,
    ) -> Result<Vec<VacationPeriodRow>, sqlx::Error> {
        sqlx::query("DELETE FROM vacation_periods WHERE request_id = $1")
            .bind(request_id)
            .execute(&mut *conn)
            .await?;

        let rows = {
            let mut rows = Vec::with_capacity(periods.len());
            for period in periods {
                let row = sqlx::query_as::<_, VacationPeriodRow>(&format!(
                    "INSERT INTO vacation_periods (request_id, start_date, end_date, day_count) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING {PERIOD_COLUMNS}"
                ))
                .bind(request_id)
                .bind(period.start_date)
                .bind(period.end_date)
                .bind(period.day_count)
                .fetch_one(&mut *conn)
                .await?;
                rows.push(row);
            }
            rows
        };

        sqlx::query("UPDATE vacation_requests SET comment = $2, updated_at = now() WHERE id = $1")
            .bind(request_id)
            .bind(comment)
            .execute(&mut *conn)
            .await?;

        Ok(rows)
    }

    /// Move a request to `status` inside the caller's transaction.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: RequestStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE vacation_requests SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status.id())
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Move a request to a decided status (Approved/Rejected), recording
    /// the deciding approver and reason.
    pub async fn set_decision(
        conn: &mut PgConnection,
        id: DbId,
        status: RequestStatus,
        decided_by: DbId,
        reason: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE vacation_requests \
             SET status = $2, decided_by = $3, decided_at = now(), \
                 decision_reason = $4, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.id())
        .bind(decided_by)
        .bind(reason)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Delete a request (periods cascade). The caller has locked the row
    /// and verified it is still Draft.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM vacation_requests WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Snapshot of every Approved period belonging to the given owners
    /// in `year`, excluding the subject request itself.
    ///
    /// Runs inside the approval transaction so the snapshot and the
    /// subsequent status change are one critical section.
    pub async fn approved_periods_in_scope(
        conn: &mut PgConnection,
        owner_ids: &[DbId],
        year: i32,
        exclude_request_id: DbId,
    ) -> Result<Vec<ApprovedScopedPeriod>, sqlx::Error> {
        sqlx::query_as::<_, ApprovedScopedPeriod>(
            "SELECT p.request_id, r.owner_id, p.start_date, p.end_date \
             FROM vacation_periods p \
             JOIN vacation_requests r ON r.id = p.request_id \
             WHERE r.owner_id = ANY($1) \
               AND r.year = $2 \
               AND r.status = $3 \
               AND r.id <> $4 \
             ORDER BY p.start_date",
        )
        .bind(owner_ids)
        .bind(year)
        .bind(RequestStatus::Approved.id())
        .bind(exclude_request_id)
        .fetch_all(conn)
        .await
    }
}

/// Insert validated periods for a request inside an open transaction.
async fn insert_periods(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    request_id: DbId,
    periods: &[VacationPeriod],
) -> Result<Vec<VacationPeriodRow>, sqlx::Error> {
    let mut rows = Vec::with_capacity(periods.len());
    for period in periods {
        let row = sqlx::query_as::<_, VacationPeriodRow>(&format!(
            "INSERT INTO vacation_periods (request_id, start_date, end_date, day_count) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {PERIOD_COLUMNS}"
        ))
        .bind(request_id)
        .bind(period.start_date)
        .bind(period.end_date)
        .bind(period.day_count)
        .fetch_one(&mut **tx)
        .await?;
        rows.push(row);
    }
    Ok(rows)
}

/// Fetch the periods of every listed request in one query and zip them
/// back onto their requests, preserving list order.
async fn attach_periods(
    pool: &PgPool,
    requests: Vec<VacationRequest>,
) -> Result<Vec<RequestWithPeriods>, sqlx::Error> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<DbId> = requests.iter().map(|r| r.id).collect();
    let rows = sqlx::query_as::<_, VacationPeriodRow>(&format!(
        "SELECT {PERIOD_COLUMNS} FROM vacation_periods \
         WHERE request_id = ANY($1) ORDER BY start_date"
    ))
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_request: HashMap<DbId, Vec<VacationPeriodRow>> = HashMap::new();
    for row in rows {
        by_request.entry(row.request_id).or_default().push(row);
    }

    Ok(requests
        .into_iter()
        .map(|request| {
            let periods = by_request.remove(&request.id).unwrap_or_default();
            RequestWithPeriods { request, periods }
        })
        .collect())
}
