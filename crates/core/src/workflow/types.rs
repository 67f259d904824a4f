//! Workflow domain types for the entry approval lifecycle.
//!
//! This module defines the statuses an entry moves through and the
//! audit payload produced by a validated transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use tallix_shared::types::UserId;

/// Approval status of a ledger entry.
///
/// Entries are created `Pending` (or `Approved` on the auto-approved
/// creation paths). The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Pending → Cancelled (cancel)
/// - Approved → Rejected (reject a prior approval)
/// - Rejected → Approved (approve after rejection)
///
/// `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Entry awaits an approval decision and can still be edited by its creator.
    Pending,
    /// Entry was approved and contributes to balances.
    Approved,
    /// Entry was rejected; excluded from balances but can be re-approved.
    Rejected,
    /// Entry was cancelled (terminal).
    Cancelled,
}

impl ApprovalStatus {
    /// All statuses, in declaration order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::Cancelled];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true while the entry content may still change (creator edits).
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if no transition can ever leave this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true if entries in this status contribute to balances.
    #[must_use]
    pub const fn counts_in_balance(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated status transition with its audit trail data.
///
/// Produced by `WorkflowService::transition`; the persistence layer turns
/// this into a new version row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionAction {
    /// Status before the transition.
    pub previous_status: ApprovalStatus,
    /// Status after the transition.
    pub new_status: ApprovalStatus,
    /// The user who performed the transition.
    pub acted_by: UserId,
    /// When the transition was performed.
    pub acted_at: DateTime<Utc>,
    /// Reason supplied with the decision (required for rejection).
    pub reason: Option<String>,
}

/// Result surface of a transition as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    /// Status before the transition.
    pub previous_status: ApprovalStatus,
    /// Status after the transition.
    pub new_status: ApprovalStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for status in ApprovalStatus::ALL {
            assert_eq!(ApprovalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApprovalStatus::parse("APPROVED"), Some(ApprovalStatus::Approved));
        assert_eq!(ApprovalStatus::parse("draft"), None);
    }

    #[test]
    fn status_display_matches_as_str() {
        assert_eq!(format!("{}", ApprovalStatus::Pending), "pending");
        assert_eq!(format!("{}", ApprovalStatus::Cancelled), "cancelled");
    }

    #[test]
    fn only_pending_is_editable() {
        assert!(ApprovalStatus::Pending.is_editable());
        assert!(!ApprovalStatus::Approved.is_editable());
        assert!(!ApprovalStatus::Rejected.is_editable());
        assert!(!ApprovalStatus::Cancelled.is_editable());
    }

    #[test]
    fn only_cancelled_is_terminal() {
        assert!(ApprovalStatus::Cancelled.is_terminal());
        assert!(!ApprovalStatus::Pending.is_terminal());
        assert!(!ApprovalStatus::Approved.is_terminal());
        assert!(!ApprovalStatus::Rejected.is_terminal());
    }

    #[test]
    fn only_approved_counts_in_balance() {
        assert!(ApprovalStatus::Approved.counts_in_balance());
        assert!(!ApprovalStatus::Pending.counts_in_balance());
        assert!(!ApprovalStatus::Rejected.counts_in_balance());
        assert!(!ApprovalStatus::Cancelled.counts_in_balance());
    }
}
