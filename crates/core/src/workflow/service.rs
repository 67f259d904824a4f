//! State machine for entry approval transitions.
//!
//! One table drives every ledger kind; the same rules apply to expense
//! and fuel entries. Guards are evaluated in a fixed order: the
//! self-approval check first (it wins even over an illegal transition),
//! then the rejection-reason requirement, then the transition table.

use chrono::Utc;

use tallix_shared::types::UserId;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ApprovalStatus, TransitionAction};

/// Stateless service validating and describing status transitions.
///
/// All methods are associated functions. On success they return a
/// `TransitionAction` carrying the audit data; the persistence layer
/// materializes it as a new version row.
pub struct WorkflowService;

impl WorkflowService {
    /// Validates a requested transition and produces its audit action.
    ///
    /// # Arguments
    /// * `current` - The entry's current approval status
    /// * `requested` - The status the caller wants to move to
    /// * `creator` - The user who originally created the entry
    /// * `actor` - The user performing the transition
    /// * `reason` - Decision note; required when rejecting
    ///
    /// # Errors
    /// * `WorkflowError::SelfApproval` if the actor approves or rejects
    ///   their own entry
    /// * `WorkflowError::RejectionReasonRequired` if rejecting without a
    ///   non-blank reason
    /// * `WorkflowError::InvalidTransition` for any pair outside the table
    pub fn transition(
        current: ApprovalStatus,
        requested: ApprovalStatus,
        creator: UserId,
        actor: UserId,
        reason: Option<String>,
    ) -> Result<TransitionAction, WorkflowError> {
        if matches!(
            requested,
            ApprovalStatus::Approved | ApprovalStatus::Rejected
        ) && actor == creator
        {
            return Err(WorkflowError::SelfApproval { user_id: actor });
        }

        if requested == ApprovalStatus::Rejected
            && !reason.as_deref().is_some_and(|r| !r.trim().is_empty())
        {
            return Err(WorkflowError::RejectionReasonRequired);
        }

        if !Self::is_valid_transition(current, requested) {
            return Err(WorkflowError::InvalidTransition {
                from: current,
                to: requested,
            });
        }

        Ok(TransitionAction {
            previous_status: current,
            new_status: requested,
            acted_by: actor,
            acted_at: Utc::now(),
            reason,
        })
    }

    /// Approves an entry.
    ///
    /// # Errors
    /// See [`Self::transition`].
    pub fn approve(
        current: ApprovalStatus,
        creator: UserId,
        actor: UserId,
    ) -> Result<TransitionAction, WorkflowError> {
        Self::transition(current, ApprovalStatus::Approved, creator, actor, None)
    }

    /// Rejects an entry with a mandatory reason.
    ///
    /// # Errors
    /// See [`Self::transition`].
    pub fn reject(
        current: ApprovalStatus,
        creator: UserId,
        actor: UserId,
        reason: String,
    ) -> Result<TransitionAction, WorkflowError> {
        Self::transition(
            current,
            ApprovalStatus::Rejected,
            creator,
            actor,
            Some(reason),
        )
    }

    /// Cancels a pending entry. The creator may cancel their own entry.
    ///
    /// # Errors
    /// See [`Self::transition`].
    pub fn cancel(
        current: ApprovalStatus,
        creator: UserId,
        actor: UserId,
        reason: Option<String>,
    ) -> Result<TransitionAction, WorkflowError> {
        Self::transition(current, ApprovalStatus::Cancelled, creator, actor, reason)
    }

    /// Check if a status transition is allowed by the table.
    ///
    /// Valid transitions:
    /// - Pending → Approved | Rejected | Cancelled
    /// - Approved → Rejected
    /// - Rejected → Approved
    ///
    /// Cancelled has no outgoing transitions, and no status may
    /// transition to itself or back to Pending.
    #[must_use]
    pub const fn is_valid_transition(from: ApprovalStatus, to: ApprovalStatus) -> bool {
        matches!(
            (from, to),
            (
                ApprovalStatus::Pending,
                ApprovalStatus::Approved | ApprovalStatus::Rejected | ApprovalStatus::Cancelled
            ) | (ApprovalStatus::Approved, ApprovalStatus::Rejected)
                | (ApprovalStatus::Rejected, ApprovalStatus::Approved)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_users() -> (UserId, UserId) {
        (UserId::new(), UserId::new())
    }

    #[test]
    fn approve_pending_by_other_user() {
        let (creator, approver) = two_users();
        let action = WorkflowService::approve(ApprovalStatus::Pending, creator, approver)
            .expect("approval should be allowed");
        assert_eq!(action.previous_status, ApprovalStatus::Pending);
        assert_eq!(action.new_status, ApprovalStatus::Approved);
        assert_eq!(action.acted_by, approver);
    }

    #[test]
    fn approve_by_creator_is_forbidden() {
        let creator = UserId::new();
        let result = WorkflowService::approve(ApprovalStatus::Pending, creator, creator);
        assert!(matches!(result, Err(WorkflowError::SelfApproval { .. })));
    }

    #[test]
    fn self_approval_wins_over_invalid_transition() {
        // Even though Cancelled → Approved is illegal, the self-approval
        // guard fires first.
        let creator = UserId::new();
        let result = WorkflowService::approve(ApprovalStatus::Cancelled, creator, creator);
        assert!(matches!(result, Err(WorkflowError::SelfApproval { .. })));
    }

    #[test]
    fn reject_requires_reason() {
        let (creator, approver) = two_users();
        let result = WorkflowService::reject(
            ApprovalStatus::Pending,
            creator,
            approver,
            String::new(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::RejectionReasonRequired)
        ));

        let result = WorkflowService::reject(
            ApprovalStatus::Pending,
            creator,
            approver,
            "   ".to_string(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::RejectionReasonRequired)
        ));
    }

    #[test]
    fn reject_pending_with_reason() {
        let (creator, approver) = two_users();
        let action = WorkflowService::reject(
            ApprovalStatus::Pending,
            creator,
            approver,
            "amount does not match the receipt".to_string(),
        )
        .expect("rejection should be allowed");
        assert_eq!(action.new_status, ApprovalStatus::Rejected);
        assert!(action.reason.is_some());
    }

    #[test]
    fn reject_after_approval_is_allowed() {
        let (creator, approver) = two_users();
        let action = WorkflowService::reject(
            ApprovalStatus::Approved,
            creator,
            approver,
            "duplicate entry".to_string(),
        )
        .expect("approved entries can be rejected");
        assert_eq!(action.previous_status, ApprovalStatus::Approved);
        assert_eq!(action.new_status, ApprovalStatus::Rejected);
    }

    #[test]
    fn approve_after_rejection_is_allowed() {
        let (creator, approver) = two_users();
        let action = WorkflowService::approve(ApprovalStatus::Rejected, creator, approver)
            .expect("rejected entries can be re-approved");
        assert_eq!(action.new_status, ApprovalStatus::Approved);
    }

    #[test]
    fn creator_may_cancel_own_pending_entry() {
        let creator = UserId::new();
        let action =
            WorkflowService::cancel(ApprovalStatus::Pending, creator, creator, None)
                .expect("cancellation has no approver-identity restriction");
        assert_eq!(action.new_status, ApprovalStatus::Cancelled);
        assert_eq!(action.acted_by, creator);
    }

    #[test]
    fn cancel_after_decision_is_invalid() {
        let (creator, actor) = two_users();
        for current in [ApprovalStatus::Approved, ApprovalStatus::Rejected] {
            let result = WorkflowService::cancel(current, creator, actor, None);
            assert!(matches!(
                result,
                Err(WorkflowError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn cancelled_is_terminal() {
        let (creator, actor) = two_users();
        let result = WorkflowService::cancel(ApprovalStatus::Cancelled, creator, actor, None);
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
        let result = WorkflowService::approve(ApprovalStatus::Cancelled, creator, actor);
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn pending_to_pending_is_invalid() {
        let (creator, actor) = two_users();
        let result = WorkflowService::transition(
            ApprovalStatus::Pending,
            ApprovalStatus::Pending,
            creator,
            actor,
            None,
        );
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn transition_table_is_exact() {
        use ApprovalStatus::{Approved, Cancelled, Pending, Rejected};

        let allowed = [
            (Pending, Approved),
            (Pending, Rejected),
            (Pending, Cancelled),
            (Approved, Rejected),
            (Rejected, Approved),
        ];

        for from in ApprovalStatus::ALL {
            for to in ApprovalStatus::ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    WorkflowService::is_valid_transition(from, to),
                    expected,
                    "table disagreement for {from} -> {to}"
                );
            }
        }
    }
}
