//! Point-in-time balance reconciliation.
//!
//! Computes the opening balance, period totals, closing balance, and
//! approval-status counts for a filtered view of the ledger. Only
//! approved entries move money; pending, rejected, and cancelled
//! versions appear in counts (or not at all) but never in a balance.
//! All sums are exact decimal arithmetic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use tallix_shared::types::SubjectId;

use crate::workflow::ApprovalStatus;

use super::types::{LedgerEntry, LedgerKind, TransactionType};

/// Sort key for reconciliation record lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySort {
    /// Order by the economic event date.
    #[default]
    EntryDate,
    /// Order by amount.
    Amount,
    /// Order by row insertion time.
    CreatedAt,
}

impl EntrySort {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EntryDate => "entry_date",
            Self::Amount => "amount",
            Self::CreatedAt => "created_at",
        }
    }

    /// Parses a sort key from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "entry_date" => Some(Self::EntryDate),
            "amount" => Some(Self::Amount),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

impl fmt::Display for EntrySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parses a direction from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Selection and ordering for reconciliation queries.
///
/// Empty vectors mean "no restriction". The date bounds are inclusive;
/// a single-day view sets both to the same date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Restrict to one ledger kind.
    pub kind: Option<LedgerKind>,
    /// Restrict to these subjects.
    pub subject_ids: Vec<SubjectId>,
    /// Restrict to these approval statuses.
    pub statuses: Vec<ApprovalStatus>,
    /// First entry date included.
    pub date_from: Option<NaiveDate>,
    /// Last entry date included.
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring match on description and category.
    pub search: Option<String>,
    /// Sort key for the record list.
    pub sort: EntrySort,
    /// Sort direction for the record list.
    pub direction: SortDirection,
}

impl EntryFilter {
    /// A filter covering exactly one entry date.
    #[must_use]
    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            date_from: Some(date),
            date_to: Some(date),
            ..Self::default()
        }
    }

    /// Whether the filter has a lower date bound.
    ///
    /// Without one there is no "before the window" and the opening
    /// balance is zero by definition.
    #[must_use]
    pub const fn has_date_floor(&self) -> bool {
        self.date_from.is_some()
    }
}

/// Counts of window entries grouped by approval status.
///
/// Cancelled versions are not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalCounts {
    /// Entries awaiting a decision.
    pub pending: u64,
    /// Approved entries.
    pub approved: u64,
    /// Rejected entries.
    pub rejected: u64,
}

impl ApprovalCounts {
    /// Tallies one entry. Cancelled entries fall through uncounted.
    pub fn record(&mut self, status: ApprovalStatus) {
        match status {
            ApprovalStatus::Pending => self.pending += 1,
            ApprovalStatus::Approved => self.approved += 1,
            ApprovalStatus::Rejected => self.rejected += 1,
            ApprovalStatus::Cancelled => {}
        }
    }

    /// Sum of the three reported buckets.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.pending + self.approved + self.rejected
    }
}

/// Balance aggregates for one filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Net approved CREDIT minus DEBIT strictly before the window.
    pub opening_balance: Decimal,
    /// Approved CREDIT total inside the window.
    pub period_credit: Decimal,
    /// Approved DEBIT total inside the window.
    pub period_debit: Decimal,
    /// `opening_balance + period_credit - period_debit`.
    pub closing_balance: Decimal,
    /// Window entries grouped by approval status.
    pub approval_counts: ApprovalCounts,
}

impl BalanceSummary {
    /// Computes the aggregates from the fetched rows.
    ///
    /// `opening_rows` are the active entries strictly before the window's
    /// start; pass an empty slice when the filter has no date floor.
    /// `window_rows` are the active entries inside the window under every
    /// non-status restriction of the filter. Non-approved rows are
    /// filtered out of the money sums here, so the caller may pass rows
    /// of any status.
    #[must_use]
    pub fn compute(opening_rows: &[LedgerEntry], window_rows: &[LedgerEntry]) -> Self {
        let opening_balance: Decimal = opening_rows
            .iter()
            .filter(|e| e.approval_status.counts_in_balance())
            .map(|e| e.signed_amount())
            .sum();

        let mut period_credit = Decimal::ZERO;
        let mut period_debit = Decimal::ZERO;
        let mut approval_counts = ApprovalCounts::default();

        for row in window_rows {
            approval_counts.record(row.approval_status);
            if row.approval_status.counts_in_balance() {
                match row.transaction_type {
                    TransactionType::Credit => period_credit += row.amount,
                    TransactionType::Debit => period_debit += row.amount,
                }
            }
        }

        Self {
            opening_balance,
            period_credit,
            period_debit,
            closing_balance: opening_balance + period_credit - period_debit,
            approval_counts,
        }
    }
}
