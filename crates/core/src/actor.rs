//! Explicit actor identity for every coordinator call.
//!
//! There is no ambient "current approver" context: callers thread an
//! [`Actor`] — a pre-authenticated id plus the visibility scope supplied
//! by the external organizational-unit collaborator — through each
//! operation.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// A pre-validated caller: id plus the set of employee ids the caller
/// may see and act upon. Scope resolution is the external collaborator's
/// job; this core only consumes the result.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: DbId,
    pub scope: HashSet<DbId>,
}

impl Actor {
    pub fn new(id: DbId, scope: impl IntoIterator<Item = DbId>) -> Self {
        Self {
            id,
            scope: scope.into_iter().collect(),
        }
    }

    /// Whether this actor is the owner of the request.
    pub fn is_owner(&self, owner_id: DbId) -> bool {
        self.id == owner_id
    }

    /// Whether this actor has scope authority over `owner_id`.
    pub fn has_scope_over(&self, owner_id: DbId) -> bool {
        self.scope.contains(&owner_id)
    }

    /// Owner-only operations: create, edit, delete, submit.
    pub fn require_owner(&self, owner_id: DbId) -> Result<(), CoreError> {
        if self.is_owner(owner_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Actor {} is not the owner of this request",
                self.id
            )))
        }
    }

    /// Approver operations: approve, reject.
    pub fn require_scope(&self, owner_id: DbId) -> Result<(), CoreError> {
        if self.has_scope_over(owner_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Actor {} has no scope authority over employee {owner_id}",
                self.id
            )))
        }
    }

    /// Cancel is permitted to the owner or any approver with scope.
    pub fn require_owner_or_scope(&self, owner_id: DbId) -> Result<(), CoreError> {
        if self.is_owner(owner_id) || self.has_scope_over(owner_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Actor {} may not act on requests of employee {owner_id}",
                self.id
            )))
        }
    }
}
