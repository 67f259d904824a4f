//! Property-based tests for the approval state machine.
//!
//! Randomized checks that the transition table, the self-approval guard,
//! and the rejection-reason guard hold for every input combination.

use proptest::prelude::*;
use uuid::Uuid;

use tallix_shared::types::UserId;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::ApprovalStatus;

/// Strategy for generating random ApprovalStatus values.
fn arb_status() -> impl Strategy<Value = ApprovalStatus> {
    prop_oneof![
        Just(ApprovalStatus::Pending),
        Just(ApprovalStatus::Approved),
        Just(ApprovalStatus::Rejected),
        Just(ApprovalStatus::Cancelled),
    ]
}

/// Strategy for generating random user ids.
fn arb_user_id() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for generating non-blank reason strings.
fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ]{0,80}".prop_map(|s| s.trim().to_string())
}

/// The transitions the table allows.
const ALLOWED: [(ApprovalStatus, ApprovalStatus); 5] = [
    (ApprovalStatus::Pending, ApprovalStatus::Approved),
    (ApprovalStatus::Pending, ApprovalStatus::Rejected),
    (ApprovalStatus::Pending, ApprovalStatus::Cancelled),
    (ApprovalStatus::Approved, ApprovalStatus::Rejected),
    (ApprovalStatus::Rejected, ApprovalStatus::Approved),
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Transition table legality
    // =========================================================================

    /// The predicate agrees with the table for every (from, to) pair.
    #[test]
    fn prop_is_valid_transition_matches_table(from in arb_status(), to in arb_status()) {
        let expected = ALLOWED.contains(&(from, to));
        prop_assert_eq!(WorkflowService::is_valid_transition(from, to), expected);
    }

    /// Any pair outside the table yields InvalidTransition when the actor
    /// is not the creator and a reason is supplied.
    #[test]
    fn prop_disallowed_pairs_yield_invalid_transition(
        from in arb_status(),
        to in arb_status(),
        creator in arb_user_id(),
        actor in arb_user_id(),
        reason in arb_reason()
    ) {
        prop_assume!(!ALLOWED.contains(&(from, to)));
        prop_assume!(actor != creator);
        prop_assume!(!reason.trim().is_empty());

        let result = WorkflowService::transition(from, to, creator, actor, Some(reason));
        match result {
            Err(WorkflowError::InvalidTransition { from: f, to: t }) => {
                prop_assert_eq!(f, from);
                prop_assert_eq!(t, to);
            }
            other => prop_assert!(false, "expected InvalidTransition, got {:?}", other),
        }
    }

    /// Allowed pairs succeed and report the requested status, when guards
    /// are satisfied.
    #[test]
    fn prop_allowed_pairs_succeed(
        pair in proptest::sample::select(&ALLOWED[..]),
        creator in arb_user_id(),
        actor in arb_user_id(),
        reason in arb_reason()
    ) {
        prop_assume!(actor != creator);
        prop_assume!(!reason.trim().is_empty());
        let (from, to) = pair;

        let action = WorkflowService::transition(from, to, creator, actor, Some(reason))
            .expect("allowed transition with satisfied guards");
        prop_assert_eq!(action.previous_status, from);
        prop_assert_eq!(action.new_status, to);
        prop_assert_eq!(action.acted_by, actor);
    }

    // =========================================================================
    // Self-approval guard
    // =========================================================================

    /// Approve or reject by the creator is always SelfApproval, whatever the
    /// current status, even when the pair is not in the table.
    #[test]
    fn prop_self_approval_always_forbidden(
        from in arb_status(),
        to in prop_oneof![Just(ApprovalStatus::Approved), Just(ApprovalStatus::Rejected)],
        creator in arb_user_id(),
        reason in arb_reason()
    ) {
        prop_assume!(!reason.trim().is_empty());
        let result = WorkflowService::transition(from, to, creator, creator, Some(reason));
        prop_assert!(matches!(result, Err(WorkflowError::SelfApproval { .. })));
    }

    /// Cancellation carries no approver-identity restriction: from Pending
    /// the creator can always cancel.
    #[test]
    fn prop_creator_can_cancel_pending(creator in arb_user_id()) {
        let action = WorkflowService::cancel(ApprovalStatus::Pending, creator, creator, None)
            .expect("creator cancels own pending entry");
        prop_assert_eq!(action.new_status, ApprovalStatus::Cancelled);
    }

    // =========================================================================
    // Rejection-reason guard
    // =========================================================================

    /// Rejection with a blank reason never succeeds, from any status.
    #[test]
    fn prop_blank_reason_rejection_fails(
        from in arb_status(),
        creator in arb_user_id(),
        actor in arb_user_id(),
        blank in "[ \t]{0,5}"
    ) {
        prop_assume!(actor != creator);
        let result = WorkflowService::reject(from, creator, actor, blank);
        prop_assert!(matches!(result, Err(WorkflowError::RejectionReasonRequired)));
    }

    /// A failed transition never fabricates an action: every error leaves
    /// no audit payload behind (type-level, but exercised for completeness).
    #[test]
    fn prop_errors_are_exclusive_with_actions(
        from in arb_status(),
        to in arb_status(),
        creator in arb_user_id(),
        actor in arb_user_id(),
        reason in arb_reason()
    ) {
        prop_assume!(!reason.trim().is_empty());
        let result = WorkflowService::transition(from, to, creator, actor, Some(reason));
        if let Ok(action) = result {
            prop_assert!(ALLOWED.contains(&(from, to)));
            prop_assert_eq!(action.new_status, to);
            if matches!(to, ApprovalStatus::Approved | ApprovalStatus::Rejected) {
                prop_assert!(actor != creator);
            }
        }
    }
}
