//! Workflow repository for entry approval-state transitions.
//!
//! A transition never rewrites the active row in place. The chain's active
//! version is locked, the request runs through the core state machine, and
//! the result is appended as a new version carrying the approval stamps.
//! The superseded version keeps its stamps, so the chain records who moved
//! the entry through every state.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tallix_core::ledger::{spawn_version, LedgerEntry};
use tallix_core::workflow::{ApprovalStatus, TransitionOutcome, WorkflowError, WorkflowService};
use tallix_shared::types::{Actor, EntryId, UserId};

use crate::entities::ledger_entries;

use super::ledger::{entry_to_active_model, model_to_entry};

/// Result of a single approval-state transition.
#[derive(Debug, Clone)]
pub struct TransitionResult {
    /// The new active version carrying the approval stamps.
    pub entry: LedgerEntry,
    /// The status movement that was applied.
    pub outcome: TransitionOutcome,
}

/// One transition within a bulk request.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    /// Any version id of the target chain.
    pub entry_id: EntryId,
    /// The status to move to.
    pub requested: ApprovalStatus,
    /// Reason for the move; required when rejecting.
    pub reason: Option<String>,
}

/// Outcome of a bulk transition.
#[derive(Debug, Clone)]
pub struct BulkTransitionResult {
    /// Per-entry results in request order.
    pub results: Vec<BulkTransitionItemResult>,
    /// Number of entries transitioned.
    pub success_count: usize,
    /// Number of entries that failed.
    pub failure_count: usize,
}

impl BulkTransitionResult {
    /// One-line human-readable summary of the outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} transitioned, {} failed",
            self.success_count, self.failure_count
        )
    }
}

/// Result of a single entry within a bulk transition.
#[derive(Debug, Clone)]
pub struct BulkTransitionItemResult {
    /// The entry id from the request.
    pub entry_id: EntryId,
    /// Whether the transition succeeded.
    pub success: bool,
    /// The status reached, when successful.
    pub new_status: Option<ApprovalStatus>,
    /// Error message when the transition failed.
    pub error: Option<String>,
}

/// Workflow repository for approval-state changes.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Moves an entry to the requested approval status.
    ///
    /// The caller may pass any version id of the chain; the transition
    /// always applies to the chain's active version. Creators cannot
    /// approve or reject their own entries, and rejections require a
    /// non-empty reason. The active version is superseded by a new version
    /// stamped with the acting user, the time, and the reason.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No version with that id exists, or the entry is deleted
    /// - The transition is not legal from the current status
    /// - The actor is the creator and the request is approve or reject
    /// - A rejection carries no reason
    /// - A database operation fails
    pub async fn transition(
        &self,
        entry_id: EntryId,
        requested: ApprovalStatus,
        actor: &Actor,
        reason: Option<String>,
    ) -> Result<TransitionResult, WorkflowError> {
        let original_id = self.resolve_original(entry_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let current_row = lock_active(&txn, original_id, entry_id).await?;
        let current = model_to_entry(current_row.clone());

        if current.is_deleted() {
            return Err(WorkflowError::EntryDeleted(entry_id));
        }

        let action = WorkflowService::transition(
            current.approval_status,
            requested,
            current.created_by,
            actor.user_id,
            reason,
        )?;

        let pair = spawn_version(&current, actor.user_id, action.acted_at).map_err(|e| {
            WorkflowError::Database(format!("version chain rejected the transition: {e}"))
        })?;

        let mut next = pair.next;
        next.approval_status = action.new_status;
        next.approved_by = Some(action.acted_by);
        next.approved_at = Some(action.acted_at);
        next.approval_reason = action.reason.clone();

        let mut retired: ledger_entries::ActiveModel = current_row.into();
        retired.is_active = Set(false);
        retired.updated_by = Set(pair.retired.updated_by.map(UserId::into_inner));
        retired.updated_at = Set(pair.retired.updated_at.into());
        retired
            .update(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        entry_to_active_model(&next)
            .insert(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        tracing::debug!(
            entry_id = %next.id,
            from = %action.previous_status,
            to = %action.new_status,
            "approval status changed"
        );

        Ok(TransitionResult {
            entry: next,
            outcome: TransitionOutcome {
                previous_status: action.previous_status,
                new_status: action.new_status,
            },
        })
    }

    /// Approves a pending or rejected entry.
    ///
    /// # Errors
    ///
    /// Same conditions as [`transition`](Self::transition).
    pub async fn approve(
        &self,
        entry_id: EntryId,
        actor: &Actor,
    ) -> Result<TransitionResult, WorkflowError> {
        self.transition(entry_id, ApprovalStatus::Approved, actor, None)
            .await
    }

    /// Rejects a pending or approved entry with a reason.
    ///
    /// # Errors
    ///
    /// Same conditions as [`transition`](Self::transition).
    pub async fn reject(
        &self,
        entry_id: EntryId,
        actor: &Actor,
        reason: String,
    ) -> Result<TransitionResult, WorkflowError> {
        self.transition(entry_id, ApprovalStatus::Rejected, actor, Some(reason))
            .await
    }

    /// Cancels a pending entry.
    ///
    /// # Errors
    ///
    /// Same conditions as [`transition`](Self::transition).
    pub async fn cancel(
        &self,
        entry_id: EntryId,
        actor: &Actor,
        reason: Option<String>,
    ) -> Result<TransitionResult, WorkflowError> {
        self.transition(entry_id, ApprovalStatus::Cancelled, actor, reason)
            .await
    }

    /// Applies several transitions, isolating failures per entry.
    ///
    /// Each request is processed independently in order; one failure does
    /// not roll back the others.
    ///
    /// # Errors
    ///
    /// Per-entry failures are captured in the result rather than returned.
    pub async fn bulk_transition(
        &self,
        requests: Vec<TransitionRequest>,
        actor: &Actor,
    ) -> Result<BulkTransitionResult, WorkflowError> {
        let mut results = Vec::with_capacity(requests.len());
        let mut success_count = 0;
        let mut failure_count = 0;

        for request in requests {
            match self
                .transition(request.entry_id, request.requested, actor, request.reason)
                .await
            {
                Ok(result) => {
                    success_count += 1;
                    results.push(BulkTransitionItemResult {
                        entry_id: request.entry_id,
                        success: true,
                        new_status: Some(result.outcome.new_status),
                        error: None,
                    });
                }
                Err(e) => {
                    failure_count += 1;
                    results.push(BulkTransitionItemResult {
                        entry_id: request.entry_id,
                        success: false,
                        new_status: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(BulkTransitionResult {
            results,
            success_count,
            failure_count,
        })
    }

    /// Resolves any version id to its chain's `original_entry_id`.
    async fn resolve_original(&self, entry_id: EntryId) -> Result<Uuid, WorkflowError> {
        let row = ledger_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::EntryNotFound(entry_id))?;

        Ok(row.original_entry_id)
    }
}

// ============================================================================
// Chain query helpers
// ============================================================================

/// Locks the chain through its root row, then reads the active version.
///
/// The lock targets the root row because its id never changes: a
/// `FOR UPDATE` on the `is_active` predicate would come back empty for a
/// waiter whose row got retired while it was blocked.
async fn lock_active(
    txn: &DatabaseTransaction,
    original_id: Uuid,
    requested: EntryId,
) -> Result<ledger_entries::Model, WorkflowError> {
    ledger_entries::Entity::find_by_id(original_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| WorkflowError::Database(e.to_string()))?
        .ok_or(WorkflowError::EntryNotFound(requested))?;

    ledger_entries::Entity::find()
        .filter(ledger_entries::Column::OriginalEntryId.eq(original_id))
        .filter(ledger_entries::Column::IsActive.eq(true))
        .one(txn)
        .await
        .map_err(|e| WorkflowError::Database(e.to_string()))?
        .ok_or(WorkflowError::EntryNotFound(requested))
}
