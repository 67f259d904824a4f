//! Version chain maintenance for append-only entries.
//!
//! A logical entry is a chain of immutable version rows linked by
//! `parent_entry_id` and sharing one `original_entry_id`. Superseding the
//! active version retires it and appends a copy with the next version
//! number; both rows must be written in the same transaction so readers
//! never observe zero or two active versions.

use chrono::{DateTime, Utc};
use thiserror::Error;

use tallix_shared::types::{EntryId, UserId};

use super::types::{CreateEntryInput, LedgerEntry};

/// Errors raised by chain maintenance and integrity checks.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Only the active version may be superseded.
    #[error("Version {0} is not active and cannot be superseded")]
    InactiveSource(EntryId),

    /// Deleted entries are terminal.
    #[error("Entry {0} is deleted; no further versions may be created")]
    DeletedSource(EntryId),

    /// A chain must contain at least its root version.
    #[error("Chain has no versions")]
    Empty,

    /// A row claims membership in a different chain.
    #[error("Version {id} belongs to chain {found}, expected {expected}")]
    MixedChains {
        /// The offending version row.
        id: EntryId,
        /// The chain it claims.
        found: EntryId,
        /// The chain under inspection.
        expected: EntryId,
    },

    /// Version numbers must run 1, 2, 3, ... without gaps.
    #[error("Chain {original} expected version {expected}, found {found}")]
    VersionGap {
        /// The chain under inspection.
        original: EntryId,
        /// The version number that should appear next.
        expected: i32,
        /// The version number actually present.
        found: i32,
    },

    /// A version's parent pointer does not reference its predecessor.
    #[error("Version {id} has a broken parent link")]
    BrokenParentLink {
        /// The offending version row.
        id: EntryId,
    },

    /// Exactly one version per chain may be active.
    #[error("Chain {original} has {count} active versions, expected 1")]
    ActiveCount {
        /// The chain under inspection.
        original: EntryId,
        /// How many rows were marked active.
        count: usize,
    },

    /// The active version must be the highest-numbered one.
    #[error("Active version of chain {original} is not the tip")]
    ActiveNotTip {
        /// The chain under inspection.
        original: EntryId,
    },
}

/// The two rows produced by superseding an active version.
///
/// `retired` is the previous active row with its active flag cleared and
/// the supersession actor stamped; `next` is the fresh copy that becomes
/// the chain's current truth. Persist both in one transaction.
#[derive(Debug, Clone)]
pub struct VersionPair {
    /// The previous active row, now retired.
    pub retired: LedgerEntry,
    /// The new active version.
    pub next: LedgerEntry,
}

/// Builds the root version of a brand-new chain.
///
/// The root's id doubles as the chain's `original_entry_id`. Manual
/// entries start pending; forced and settlement entries are created
/// already approved, with the creator stamped as approver. This is the
/// one sanctioned exception to the self-approval rule.
#[must_use]
pub fn root_version(input: &CreateEntryInput, creator: UserId, at: DateTime<Utc>) -> LedgerEntry {
    let id = EntryId::new();
    let approval_status = input.origin.initial_status();
    let (approved_by, approved_at) = if input.origin.is_auto_approved() {
        (Some(creator), Some(at))
    } else {
        (None, None)
    };

    LedgerEntry {
        id,
        original_entry_id: id,
        parent_entry_id: None,
        version_number: 1,
        is_active: true,
        kind: input.kind,
        transaction_type: input.transaction_type,
        amount: input.amount,
        entry_date: input.entry_date,
        category: input.category.trim().to_string(),
        payment_mode: input.payment_mode.trim().to_string(),
        description: input.description.clone(),
        odometer: input.odometer,
        subject_id: input.subject_id,
        origin: input.origin,
        approval_status,
        approved_by,
        approved_at,
        approval_reason: None,
        edit_reason: None,
        created_by: creator,
        created_at: at,
        updated_by: None,
        updated_at: at,
        deleted_by: None,
        deleted_at: None,
    }
}

/// Supersedes the active version of a chain.
///
/// The new version copies every content field from `current`; callers
/// overlay whatever the operation changes (patched fields for an edit,
/// approval fields for a transition). Chain bookkeeping is handled here:
/// the copy gets a fresh id, points at `current` as its parent, takes the
/// next version number, and becomes active. `edit_reason` is per-version
/// provenance and starts out clear.
///
/// # Errors
///
/// Returns an error if `current` is not the active version or the entry
/// has been soft-deleted.
pub fn spawn_version(
    current: &LedgerEntry,
    actor: UserId,
    at: DateTime<Utc>,
) -> Result<VersionPair, ChainError> {
    if !current.is_active {
        return Err(ChainError::InactiveSource(current.id));
    }
    if current.is_deleted() {
        return Err(ChainError::DeletedSource(current.id));
    }

    let mut retired = current.clone();
    retired.is_active = false;
    retired.updated_by = Some(actor);
    retired.updated_at = at;

    let mut next = current.clone();
    next.id = EntryId::new();
    next.parent_entry_id = Some(current.id);
    next.version_number = current.version_number + 1;
    next.is_active = true;
    next.edit_reason = None;
    next.created_at = at;
    next.updated_at = at;
    next.updated_by = None;

    Ok(VersionPair { retired, next })
}

/// Checks the structural invariants of a full chain.
///
/// Accepts the chain's rows in any order and verifies: a single root with
/// version 1 whose id equals `original_entry_id`, contiguous version
/// numbers, parent links forming one unbroken path, exactly one active
/// row, and that the active row is the tip.
///
/// # Errors
///
/// Returns the first violated invariant.
pub fn verify(chain: &[LedgerEntry]) -> Result<(), ChainError> {
    let Some(first) = chain.first() else {
        return Err(ChainError::Empty);
    };
    let original = first.original_entry_id;

    for row in chain {
        if row.original_entry_id != original {
            return Err(ChainError::MixedChains {
                id: row.id,
                found: row.original_entry_id,
                expected: original,
            });
        }
    }

    let mut ordered: Vec<&LedgerEntry> = chain.iter().collect();
    ordered.sort_by_key(|row| row.version_number);

    let root = ordered[0];
    if root.version_number != 1 {
        return Err(ChainError::VersionGap {
            original,
            expected: 1,
            found: root.version_number,
        });
    }
    if root.parent_entry_id.is_some() || root.id != original {
        return Err(ChainError::BrokenParentLink { id: root.id });
    }

    for pair in ordered.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.version_number != prev.version_number + 1 {
            return Err(ChainError::VersionGap {
                original,
                expected: prev.version_number + 1,
                found: next.version_number,
            });
        }
        if next.parent_entry_id != Some(prev.id) {
            return Err(ChainError::BrokenParentLink { id: next.id });
        }
    }

    let active_count = ordered.iter().filter(|row| row.is_active).count();
    if active_count != 1 {
        return Err(ChainError::ActiveCount {
            original,
            count: active_count,
        });
    }

    // ordered is non-empty, the last element is the tip
    if let Some(tip) = ordered.last() {
        if !tip.is_active {
            return Err(ChainError::ActiveNotTip { original });
        }
    }

    Ok(())
}
