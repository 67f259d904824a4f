//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during ledger operations,
//! including reference validation errors, domain rule errors, edit and
//! delete policy errors, and persistence errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use tallix_shared::types::{EntryId, SubjectId};

use crate::ledger::types::LedgerKind;
use crate::workflow::ApprovalStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Reference Validation Errors ==========
    /// Category is not on the configured allow-list.
    #[error("Unknown category '{category}', allowed: {}", allowed.join(", "))]
    UnknownCategory {
        /// The rejected category.
        category: String,
        /// The configured allow-list.
        allowed: Vec<String>,
    },

    /// Payment mode is not on the configured allow-list.
    #[error("Unknown payment mode '{payment_mode}', allowed: {}", allowed.join(", "))]
    UnknownPaymentMode {
        /// The rejected payment mode.
        payment_mode: String,
        /// The configured allow-list.
        allowed: Vec<String>,
    },

    /// Entry date lies after today in the acting timezone.
    #[error("Entry date {entry_date} is in the future (today is {today})")]
    FutureDate {
        /// The rejected entry date.
        entry_date: NaiveDate,
        /// Today in the acting timezone.
        today: NaiveDate,
    },

    /// Entry date lies before the configured lookback window.
    #[error("Entry date {entry_date} is older than the allowed {allowed_days} days")]
    TooOld {
        /// The rejected entry date.
        entry_date: NaiveDate,
        /// Today in the acting timezone.
        today: NaiveDate,
        /// The configured lookback window in days.
        allowed_days: u32,
    },

    // ========== Domain Rule Errors ==========
    /// Entry amount cannot be negative.
    #[error("Amount {0} is negative")]
    NegativeAmount(Decimal),

    /// Fuel entries must carry an odometer reading.
    #[error("Odometer reading is required for {kind} entries")]
    MissingOdometer {
        /// The ledger kind that requires the reading.
        kind: LedgerKind,
    },

    /// Expense entries must not carry an odometer reading.
    #[error("Odometer reading is not applicable to {kind} entries")]
    UnexpectedOdometer {
        /// The ledger kind that forbids the reading.
        kind: LedgerKind,
    },

    /// An odometer reading went backwards relative to an approved entry.
    #[error(
        "Odometer {new_value} for subject {subject_id} is below the approved reading {previous_value} from {previous_date}"
    )]
    OdometerRegression {
        /// The subject whose reading regressed.
        subject_id: SubjectId,
        /// The rejected new reading.
        new_value: Decimal,
        /// The approved reading it regresses against.
        previous_value: Decimal,
        /// Entry date of that approved entry.
        previous_date: NaiveDate,
    },

    // ========== Edit and Delete Policy Errors ==========
    /// Entry content can only change while pending.
    #[error("Entry is {status} and can no longer be edited")]
    NotEditable {
        /// The status blocking the edit.
        status: ApprovalStatus,
    },

    /// Only the creator may edit an entry.
    #[error("Only the creator may edit this entry")]
    NotOwner,

    /// Deleting a non-pending entry requires an elevated role.
    #[error("Entry is {status}; deleting it requires an elevated role")]
    DeleteForbidden {
        /// The status blocking the delete.
        status: ApprovalStatus,
    },

    /// The entry was already soft-deleted.
    #[error("Entry {0} has already been deleted")]
    AlreadyDeleted(EntryId),

    // ========== Lookup Errors ==========
    /// Entry not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// The subject the entry refers to does not exist.
    #[error("Subject not found: {0}")]
    SubjectNotFound(SubjectId),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            Self::UnknownPaymentMode { .. } => "UNKNOWN_PAYMENT_MODE",
            Self::FutureDate { .. } => "FUTURE_ENTRY_DATE",
            Self::TooOld { .. } => "ENTRY_DATE_TOO_OLD",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::MissingOdometer { .. } => "MISSING_ODOMETER",
            Self::UnexpectedOdometer { .. } => "UNEXPECTED_ODOMETER",
            Self::OdometerRegression { .. } => "ODOMETER_REGRESSION",
            Self::NotEditable { .. } => "ENTRY_NOT_EDITABLE",
            Self::NotOwner => "NOT_OWNER",
            Self::DeleteForbidden { .. } => "DELETE_FORBIDDEN",
            Self::AlreadyDeleted(_) => "ALREADY_DELETED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::SubjectNotFound(_) => "SUBJECT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation and state errors
            Self::UnknownCategory { .. }
            | Self::UnknownPaymentMode { .. }
            | Self::FutureDate { .. }
            | Self::TooOld { .. }
            | Self::NegativeAmount(_)
            | Self::MissingOdometer { .. }
            | Self::UnexpectedOdometer { .. }
            | Self::OdometerRegression { .. }
            | Self::NotEditable { .. }
            | Self::AlreadyDeleted(_) => 400,

            // 403 Forbidden - ownership and role errors
            Self::NotOwner | Self::DeleteForbidden { .. } => 403,

            // 404 Not Found
            Self::EntryNotFound(_) | Self::SubjectNotFound(_) => 404,

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }
}
