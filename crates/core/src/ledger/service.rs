//! Ledger service for entry validation.
//!
//! This module composes the reference validator and the per-kind domain
//! rules into the checks that gate each mutation before it touches the
//! chain. It contains pure business logic with no database dependencies;
//! store lookups (subject existence, prior odometer readings) are
//! injected as closures.

use chrono::NaiveDate;

use tallix_shared::types::{Actor, SubjectId};

use super::error::LedgerError;
use super::rules::{self, PriorReading};
use super::types::{CreateEntryInput, EntryPatch, LedgerEntry};
use super::validation::{ReferenceDataProvider, ReferenceValidator};

/// Validation for ledger mutations.
pub struct LedgerService;

impl LedgerService {
    /// Validates a create request before the root version is inserted.
    ///
    /// Performs, in order:
    /// 1. Subject existence via `subject_lookup`
    /// 2. Category, payment mode, and date-window checks
    /// 3. Amount sign and per-kind odometer shape
    /// 4. Monotonic odometer check against the latest approved reading
    ///
    /// `today` is the current date in the acting user's timezone.
    /// `prior_reading` is only consulted for odometer-tracking kinds.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate_create<P, S, O>(
        input: &CreateEntryInput,
        today: NaiveDate,
        validator: &ReferenceValidator<P>,
        subject_lookup: S,
        prior_reading: O,
    ) -> Result<(), LedgerError>
    where
        P: ReferenceDataProvider,
        S: Fn(SubjectId) -> Result<(), LedgerError>,
        O: Fn(SubjectId) -> Result<Option<PriorReading>, LedgerError>,
    {
        subject_lookup(input.subject_id)?;
        validator.validate(&input.category, &input.payment_mode, input.entry_date, today)?;
        rules::validate_amount(input.amount)?;
        rules::validate_kind_shape(input.kind, input.odometer)?;

        if input.kind.tracks_odometer() {
            if let Some(reading) = input.odometer {
                let prior = prior_reading(input.subject_id)?;
                rules::check_monotonic(input.subject_id, reading, prior.as_ref())?;
            }
        }

        Ok(())
    }

    /// Validates an edit request against the current active version.
    ///
    /// Edits are only legal while the entry is pending and only for its
    /// creator. The patched result is then re-validated in full, exactly
    /// like a create; `prior_reading` must exclude the entry's own chain
    /// so an edit cannot regress against itself.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDeleted`, `NotEditable`, or `NotOwner` for policy
    /// violations, otherwise the first failing content check.
    pub fn validate_edit<P, O>(
        current: &LedgerEntry,
        patch: &EntryPatch,
        actor: &Actor,
        today: NaiveDate,
        validator: &ReferenceValidator<P>,
        prior_reading: O,
    ) -> Result<(), LedgerError>
    where
        P: ReferenceDataProvider,
        O: Fn(SubjectId) -> Result<Option<PriorReading>, LedgerError>,
    {
        if current.is_deleted() {
            return Err(LedgerError::AlreadyDeleted(current.id));
        }
        if !current.approval_status.is_editable() {
            return Err(LedgerError::NotEditable {
                status: current.approval_status,
            });
        }
        if actor.user_id != current.created_by {
            return Err(LedgerError::NotOwner);
        }

        let preview = patch.applied_to(current);
        validator.validate(
            &preview.category,
            &preview.payment_mode,
            preview.entry_date,
            today,
        )?;
        rules::validate_amount(preview.amount)?;
        rules::validate_kind_shape(preview.kind, preview.odometer)?;

        if preview.kind.tracks_odometer() {
            if let Some(reading) = preview.odometer {
                let prior = prior_reading(preview.subject_id)?;
                rules::check_monotonic(preview.subject_id, reading, prior.as_ref())?;
            }
        }

        Ok(())
    }

    /// Validates a soft-delete request.
    ///
    /// Pending entries may be deleted by their creator or by an elevated
    /// role; entries in any other status require an elevated role.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDeleted`, `NotOwner`, or `DeleteForbidden`.
    pub fn validate_delete(current: &LedgerEntry, actor: &Actor) -> Result<(), LedgerError> {
        if current.is_deleted() {
            return Err(LedgerError::AlreadyDeleted(current.id));
        }

        if current.approval_status.is_editable() {
            if actor.user_id == current.created_by || actor.role.is_elevated() {
                Ok(())
            } else {
                Err(LedgerError::NotOwner)
            }
        } else if actor.role.is_elevated() {
            Ok(())
        } else {
            Err(LedgerError::DeleteForbidden {
                status: current.approval_status,
            })
        }
    }
}
