//! Repository for the `leave_limits` allowance ledger.
//!
//! `committed_days` is mutated only by the lifecycle/approval
//! transactions; callers outside those paths get read-only access.

use leavedesk_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::limit::LimitRecord;

const COLUMNS: &str = "\
    id, owner_id, year, total_days, committed_days, created_at, updated_at";

/// Per-(owner, year) allowance ledger.
pub struct LimitRepo;

impl LimitRepo {
    /// Find the ledger record for an owner and year, if one exists.
    pub async fn find(
        pool: &PgPool,
        owner_id: DbId,
        year: i32,
    ) -> Result<Option<LimitRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leave_limits WHERE owner_id = $1 AND year = $2");
        sqlx::query_as::<_, LimitRecord>(&query)
            .bind(owner_id)
            .bind(year)
            .fetch_optional(pool)
            .await
    }

    /// Set the administrative allowance, creating the record on first
    /// reference. Never touches `committed_days`.
    pub async fn set_allowance(
        pool: &PgPool,
        owner_id: DbId,
        year: i32,
        total_days: i32,
    ) -> Result<LimitRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO leave_limits (owner_id, year, total_days) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_leave_limits_owner_year \
             DO UPDATE SET total_days = EXCLUDED.total_days, updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LimitRecord>(&query)
            .bind(owner_id)
            .bind(year)
            .bind(total_days)
            .fetch_one(pool)
            .await
    }

    /// Lock the ledger row for the caller's transaction, creating it
    /// with a zero allowance on first reference.
    ///
    /// This is the per-(owner, year) serialization point for every
    /// transition that touches the committed tally.
    pub async fn lock_or_insert(
        conn: &mut PgConnection,
        owner_id: DbId,
        year: i32,
    ) -> Result<LimitRecord, sqlx::Error> {
        sqlx::query(
            "INSERT INTO leave_limits (owner_id, year) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_leave_limits_owner_year DO NOTHING",
        )
        .bind(owner_id)
        .bind(year)
        .execute(&mut *conn)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM leave_limits \
             WHERE owner_id = $1 AND year = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, LimitRecord>(&query)
            .bind(owner_id)
            .bind(year)
            .fetch_one(conn)
            .await
    }

    /// Reserve days: increment the committed tally.
    ///
    /// The caller has already run the core allowance check under the
    /// row lock taken by [`Self::lock_or_insert`].
    pub async fn reserve(
        conn: &mut PgConnection,
        id: DbId,
        days: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE leave_limits \
             SET committed_days = committed_days + $2, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(days)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Release days: decrement the committed tally, floored at zero.
    pub async fn release(
        conn: &mut PgConnection,
        id: DbId,
        days: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE leave_limits \
             SET committed_days = GREATEST(committed_days - $2, 0), updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(days)
        .execute(conn)
        .await?;
        Ok(())
    }
}
