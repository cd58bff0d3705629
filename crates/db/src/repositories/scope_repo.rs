//! Read-only access to externally maintained organizational facts.
//!
//! The org-unit service owns `visibility_scopes` and `org_memberships`;
//! this engine consumes them and never computes org structure itself.

use leavedesk_core::types::DbId;
use sqlx::PgPool;

/// Visibility-scope and org-membership lookups.
pub struct ScopeRepo;

impl ScopeRepo {
    /// The set of employee ids an approver may see and act upon.
    pub async fn resolve_visibility_scope(
        pool: &PgPool,
        approver_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT employee_id FROM visibility_scopes WHERE approver_id = $1 ORDER BY employee_id",
        )
        .bind(approver_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// The organizational unit an employee belongs to. Informational
    /// only; no engine decision depends on it.
    pub async fn unit_of(pool: &PgPool, employee_id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT unit_id FROM org_memberships WHERE employee_id = $1")
                .bind(employee_id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(unit_id,)| unit_id))
    }
}
