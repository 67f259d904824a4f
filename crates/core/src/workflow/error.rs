//! Workflow error types for the entry approval lifecycle.

use thiserror::Error;

use tallix_shared::types::{EntryId, UserId};

use crate::workflow::types::ApprovalStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Attempted a status transition the table does not allow.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ApprovalStatus,
        /// The attempted target status.
        to: ApprovalStatus,
    },

    /// The approver is the entry's creator.
    #[error("User {user_id} cannot approve or reject their own entry")]
    SelfApproval {
        /// The user who attempted to act on their own entry.
        user_id: UserId,
    },

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Entry not found.
    #[error("Entry {0} not found")]
    EntryNotFound(EntryId),

    /// Entry was soft-deleted; no further transitions are possible.
    #[error("Entry {0} has been deleted")]
    EntryDeleted(EntryId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::RejectionReasonRequired
            | Self::EntryDeleted(_) => 400,
            Self::SelfApproval { .. } => 403,
            Self::EntryNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::SelfApproval { .. } => "SELF_APPROVAL_FORBIDDEN",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::EntryDeleted(_) => "ENTRY_DELETED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_error() {
        let err = WorkflowError::InvalidTransition {
            from: ApprovalStatus::Cancelled,
            to: ApprovalStatus::Approved,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("cancelled"));
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn self_approval_error() {
        let err = WorkflowError::SelfApproval {
            user_id: UserId::new(),
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "SELF_APPROVAL_FORBIDDEN");
    }

    #[test]
    fn rejection_reason_required_error() {
        let err = WorkflowError::RejectionReasonRequired;
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "REJECTION_REASON_REQUIRED");
    }

    #[test]
    fn entry_not_found_error() {
        let err = WorkflowError::EntryNotFound(EntryId::new());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "ENTRY_NOT_FOUND");
    }

    #[test]
    fn entry_deleted_error() {
        let err = WorkflowError::EntryDeleted(EntryId::new());
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "ENTRY_DELETED");
    }

    #[test]
    fn database_error() {
        let err = WorkflowError::Database("connection lost".to_string());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }
}
