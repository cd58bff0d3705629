//! Transactional services orchestrating the request lifecycle.
//!
//! Handlers stay thin; each operation here is a single database
//! transaction, so a caller that aborts mid-call leaves it either fully
//! applied or not applied at all.

pub mod approval;
pub mod lifecycle;

use leavedesk_core::actor::Actor;
use leavedesk_core::types::DbId;
use leavedesk_db::repositories::ScopeRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// Build the explicit [`Actor`] for a caller by resolving their
/// visibility scope from the external org facts.
///
/// An actor with an empty scope is still valid; they can only act as an
/// owner.
pub async fn resolve_actor(pool: &PgPool, actor_id: DbId) -> AppResult<Actor> {
    let scope = ScopeRepo::resolve_visibility_scope(pool, actor_id).await?;
    Ok(Actor::new(actor_id, scope))
}
