//! Ledger domain types for versioned entries.
//!
//! This module defines the entry record, its classifying enums, and the
//! input shapes used to create and edit entries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use tallix_shared::types::{EntryId, SubjectId, UserId};

use crate::workflow::ApprovalStatus;

/// Kind of ledger an entry belongs to.
///
/// Both kinds share the same version-chain and approval mechanics;
/// they differ only in which domain rules run before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    /// General expense entries.
    Expense,
    /// Fuel entries for movement-tracked subjects (vehicles).
    Fuel,
}

impl LedgerKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Fuel => "fuel",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "fuel" => Some(Self::Fuel),
            _ => None,
        }
    }

    /// Whether entries of this kind carry a monotonic odometer reading.
    #[must_use]
    pub const fn tracks_odometer(&self) -> bool {
        matches!(self, Self::Fuel)
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of an entry: credit raises the balance, debit lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money in.
    Credit,
    /// Money out.
    Debit,
}

impl TransactionType {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Parses a transaction type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an entry came into existence.
///
/// Forced and settlement entries skip the approval workflow: they are
/// created directly in `Approved` status, and are the only case where
/// `approved_by` may equal `created_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrigin {
    /// Regular entry via the normal approval workflow.
    Manual,
    /// Administratively forced entry, auto-approved.
    Forced,
    /// Settlement entry produced by balancing, auto-approved.
    Settlement,
}

impl EntryOrigin {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Forced => "forced",
            Self::Settlement => "settlement",
        }
    }

    /// Parses an origin from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Some(Self::Manual),
            "forced" => Some(Self::Forced),
            "settlement" => Some(Self::Settlement),
            _ => None,
        }
    }

    /// Whether entries of this origin are created already approved.
    #[must_use]
    pub const fn is_auto_approved(&self) -> bool {
        matches!(self, Self::Forced | Self::Settlement)
    }

    /// The approval status a fresh entry of this origin starts in.
    #[must_use]
    pub const fn initial_status(&self) -> ApprovalStatus {
        if self.is_auto_approved() {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Pending
        }
    }
}

impl fmt::Display for EntryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One version row of a ledger entry.
///
/// A logical entry is the chain of all versions sharing
/// `original_entry_id`; exactly one of them is active at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique id of this version row.
    pub id: EntryId,
    /// Stable root id shared by every version of the chain.
    pub original_entry_id: EntryId,
    /// Immediate predecessor version, `None` for the root.
    pub parent_entry_id: Option<EntryId>,
    /// 1 for the root, +1 per supersession.
    pub version_number: i32,
    /// Whether this version is the chain's current truth.
    pub is_active: bool,
    /// Ledger kind.
    pub kind: LedgerKind,
    /// Credit or debit.
    pub transaction_type: TransactionType,
    /// Non-negative monetary amount; sign comes from `transaction_type`.
    pub amount: Decimal,
    /// Date of the economic event.
    pub entry_date: NaiveDate,
    /// Category from the reference allow-list.
    pub category: String,
    /// Payment mode from the reference allow-list.
    pub payment_mode: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Odometer reading, present for movement-tracked kinds.
    pub odometer: Option<Decimal>,
    /// The subject (vehicle, card, ...) this entry belongs to.
    pub subject_id: SubjectId,
    /// How the entry was created.
    pub origin: EntryOrigin,
    /// Current approval status.
    pub approval_status: ApprovalStatus,
    /// User of the last approval-machine decision on this version.
    pub approved_by: Option<UserId>,
    /// When that decision was made.
    pub approved_at: Option<DateTime<Utc>>,
    /// Reason recorded with the decision (required for rejections).
    pub approval_reason: Option<String>,
    /// Reason recorded when this version was produced by an edit.
    pub edit_reason: Option<String>,
    /// The chain's creator; identical on every version.
    pub created_by: UserId,
    /// When this version row was inserted.
    pub created_at: DateTime<Utc>,
    /// Actor of the last supersession touching this row.
    pub updated_by: Option<UserId>,
    /// When this row last changed.
    pub updated_at: DateTime<Utc>,
    /// Who soft-deleted the entry, if anyone.
    pub deleted_by: Option<UserId>,
    /// When the entry was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Whether the entry has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether this row is the first version of its chain.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.version_number == 1 && self.parent_entry_id.is_none()
    }

    /// Amount signed by direction: credits positive, debits negative.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Credit => self.amount,
            TransactionType::Debit => -self.amount,
        }
    }
}

/// Input for creating a new entry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// Ledger kind.
    pub kind: LedgerKind,
    /// Credit or debit.
    pub transaction_type: TransactionType,
    /// Non-negative monetary amount.
    pub amount: Decimal,
    /// Date of the economic event.
    pub entry_date: NaiveDate,
    /// Category; must match the reference allow-list.
    pub category: String,
    /// Payment mode; must match the reference allow-list.
    pub payment_mode: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Odometer reading; required for movement-tracked kinds.
    pub odometer: Option<Decimal>,
    /// The subject this entry belongs to.
    pub subject_id: SubjectId,
    /// Creation path; forced/settlement entries start approved.
    pub origin: EntryOrigin,
    /// Opaque file keys to associate with the chain.
    pub attachment_keys: Vec<String>,
}

/// Partial patch applied by an edit.
///
/// `None` fields keep the current version's value.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    /// New direction.
    pub transaction_type: Option<TransactionType>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New event date.
    pub entry_date: Option<NaiveDate>,
    /// New category.
    pub category: Option<String>,
    /// New payment mode.
    pub payment_mode: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New odometer reading.
    pub odometer: Option<Decimal>,
    /// Why the entry was edited; stored on the new version.
    pub edit_reason: Option<String>,
    /// Replacement set of attachment keys.
    pub attachment_keys: Option<Vec<String>>,
}

impl EntryPatch {
    /// Whether the patch changes any persisted field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.amount.is_none()
            && self.entry_date.is_none()
            && self.category.is_none()
            && self.payment_mode.is_none()
            && self.description.is_none()
            && self.odometer.is_none()
            && self.attachment_keys.is_none()
    }

    /// The entry as it would look with this patch applied.
    #[must_use]
    pub fn applied_to(&self, current: &LedgerEntry) -> LedgerEntry {
        let mut next = current.clone();
        if let Some(transaction_type) = self.transaction_type {
            next.transaction_type = transaction_type;
        }
        if let Some(amount) = self.amount {
            next.amount = amount;
        }
        if let Some(entry_date) = self.entry_date {
            next.entry_date = entry_date;
        }
        if let Some(category) = &self.category {
            next.category.clone_from(category);
        }
        if let Some(payment_mode) = &self.payment_mode {
            next.payment_mode.clone_from(payment_mode);
        }
        if let Some(description) = &self.description {
            next.description = Some(description.clone());
        }
        if let Some(odometer) = self.odometer {
            next.odometer = Some(odometer);
        }
        next
    }
}
