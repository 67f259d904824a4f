//! Ledger repository for versioned entry database operations.
//!
//! Every mutation follows the same discipline: resolve the requested id to
//! its version chain, lock the chain inside a transaction, run the core
//! validation, then write the supersession as one atomic
//! update-plus-insert. Content never changes in place; history accumulates.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tallix_core::ledger::{
    root_version, spawn_version, verify, CreateEntryInput, EntryOrigin, EntryPatch, LedgerEntry,
    LedgerError, LedgerKind, LedgerService, PriorReading, ReferenceLists, ReferenceValidator,
    TransactionType,
};
use tallix_core::workflow::ApprovalStatus;
use tallix_shared::types::{Actor, AttachmentId, EntryId, SubjectId, UserId};

use crate::entities::sea_orm_active_enums::{
    ApprovalStatus as DbApprovalStatus, EntryOrigin as DbEntryOrigin, LedgerKind as DbLedgerKind,
    TransactionType as DbTransactionType,
};
use crate::entities::{entry_attachments, ledger_entries};

use super::settings::SettingsRepository;

/// Lookup abstraction for validating subject references.
///
/// The ledger stores `subject_id` as an opaque reference; the deployment
/// decides what a subject is (vehicle, cost center, project). Implementors
/// answer existence checks and nothing more.
#[async_trait::async_trait]
pub trait SubjectRegistry: Send + Sync {
    /// Returns whether the subject exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    async fn subject_exists(&self, subject_id: SubjectId) -> Result<bool, LedgerError>;
}

/// A fixed, in-memory subject registry.
///
/// Suitable for deployments with a small, static fleet and for tests.
#[derive(Debug, Clone, Default)]
pub struct KnownSubjects {
    subjects: HashSet<SubjectId>,
}

impl KnownSubjects {
    /// Creates a registry over the given subjects.
    #[must_use]
    pub fn new(subjects: impl IntoIterator<Item = SubjectId>) -> Self {
        Self {
            subjects: subjects.into_iter().collect(),
        }
    }

    /// Adds a subject to the registry.
    pub fn insert(&mut self, subject_id: SubjectId) {
        self.subjects.insert(subject_id);
    }
}

#[async_trait::async_trait]
impl SubjectRegistry for KnownSubjects {
    async fn subject_exists(&self, subject_id: SubjectId) -> Result<bool, LedgerError> {
        Ok(self.subjects.contains(&subject_id))
    }
}

/// An entry version together with the chain's attachment keys.
#[derive(Debug, Clone)]
pub struct EntryWithAttachments {
    /// The entry version.
    pub entry: LedgerEntry,
    /// Attachment file keys associated with the chain.
    pub attachment_keys: Vec<String>,
}

/// Outcome of a bulk delete.
#[derive(Debug, Clone)]
pub struct BulkDeleteResult {
    /// Per-entry results in request order.
    pub results: Vec<BulkDeleteItemResult>,
    /// Number of entries deleted.
    pub success_count: usize,
    /// Number of entries that failed.
    pub failure_count: usize,
}

impl BulkDeleteResult {
    /// One-line human-readable summary of the outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} deleted, {} failed", self.success_count, self.failure_count)
    }
}

/// Result of a single entry within a bulk delete.
#[derive(Debug, Clone)]
pub struct BulkDeleteItemResult {
    /// The entry id from the request.
    pub entry_id: EntryId,
    /// Whether the delete succeeded.
    pub success: bool,
    /// Error message when the delete failed.
    pub error: Option<String>,
}

/// Ledger repository for entry CRUD with version-chain semantics.
#[derive(Debug, Clone)]
pub struct LedgerRepository<R> {
    db: DatabaseConnection,
    subjects: R,
    settings: SettingsRepository,
    lookback_days: u32,
}

impl<R: SubjectRegistry> LedgerRepository<R> {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(
        db: DatabaseConnection,
        subjects: R,
        settings: SettingsRepository,
        lookback_days: u32,
    ) -> Self {
        Self {
            db,
            subjects,
            settings,
            lookback_days,
        }
    }

    /// Creates the root version of a new entry.
    ///
    /// Manual entries start pending; forced and settlement entries are
    /// auto-approved with the creator stamped as approver. Attachment keys
    /// are stored against the chain, deduplicated, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The subject does not exist
    /// - Category or payment mode is not on the allow-list
    /// - The entry date is in the future or beyond the lookback window
    /// - The odometer shape or monotonic rule is violated
    /// - A database operation fails
    pub async fn create_entry(
        &self,
        input: CreateEntryInput,
        actor: &Actor,
    ) -> Result<EntryWithAttachments, LedgerError> {
        let now = Utc::now();
        let today = actor.local_date(now);

        let subject_exists = self.subjects.subject_exists(input.subject_id).await?;
        let prior = if input.kind.tracks_odometer() && input.odometer.is_some() {
            latest_approved_reading(&self.db, input.subject_id.into_inner(), None).await?
        } else {
            None
        };
        let validator = self.reference_validator().await?;

        LedgerService::validate_create(
            &input,
            today,
            &validator,
            |subject_id| {
                if subject_exists {
                    Ok(())
                } else {
                    Err(LedgerError::SubjectNotFound(subject_id))
                }
            },
            |_| Ok(prior),
        )?;

        let entry = root_version(&input, actor.user_id, now);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        entry_to_active_model(&entry)
            .insert(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let attachment_keys = replace_attachment_keys(
            &txn,
            entry.original_entry_id.into_inner(),
            &input.attachment_keys,
            actor.user_id.into_inner(),
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        tracing::debug!(
            entry_id = %entry.id,
            subject_id = %entry.subject_id,
            origin = %entry.origin,
            "ledger entry created"
        );

        Ok(EntryWithAttachments {
            entry,
            attachment_keys,
        })
    }

    /// Gets the active version of the chain containing the given id.
    ///
    /// Any version id of the chain resolves to the same result. Soft-deleted
    /// entries remain readable.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no version with that id exists.
    pub async fn get_entry(&self, entry_id: EntryId) -> Result<EntryWithAttachments, LedgerError> {
        let original_id = self.resolve_original(entry_id).await?;

        let row = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::OriginalEntryId.eq(original_id))
            .filter(ledger_entries::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        let attachment_keys = attachment_keys_for(&self.db, original_id).await?;

        Ok(EntryWithAttachments {
            entry: model_to_entry(row),
            attachment_keys,
        })
    }

    /// Returns the full version history of a chain, oldest first.
    ///
    /// The chain's structural invariants are checked before returning, so a
    /// corrupted chain surfaces loudly instead of as quietly wrong data.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for an unknown id, or a database error when
    /// the chain fails verification.
    pub async fn history(&self, entry_id: EntryId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let original_id = self.resolve_original(entry_id).await?;

        let rows = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::OriginalEntryId.eq(original_id))
            .order_by_asc(ledger_entries::Column::VersionNumber)
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let entries: Vec<LedgerEntry> = rows.into_iter().map(model_to_entry).collect();

        verify(&entries).map_err(|e| {
            LedgerError::Database(format!("corrupt version chain for entry {entry_id}: {e}"))
        })?;

        Ok(entries)
    }

    /// Applies a content patch by superseding the active version.
    ///
    /// Only the creator may edit and only while the entry is pending. The
    /// patched content is re-validated in full; the monotonic odometer check
    /// excludes the entry's own chain so an edit cannot regress against
    /// itself. When the patch carries attachment keys the chain's attachment
    /// set is replaced, otherwise it is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No version with that id exists
    /// - The entry is deleted, no longer pending, or owned by someone else
    /// - The patched content fails any create-time validation
    /// - A database operation fails
    pub async fn edit_entry(
        &self,
        entry_id: EntryId,
        patch: EntryPatch,
        actor: &Actor,
    ) -> Result<EntryWithAttachments, LedgerError> {
        let now = Utc::now();
        let today = actor.local_date(now);
        let original_id = self.resolve_original(entry_id).await?;
        let validator = self.reference_validator().await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let current_row = lock_active(&txn, original_id, entry_id).await?;
        let current = model_to_entry(current_row.clone());

        let preview_odometer = patch.odometer.or(current.odometer);
        let prior = if current.kind.tracks_odometer() && preview_odometer.is_some() {
            latest_approved_reading(&txn, current.subject_id.into_inner(), Some(original_id))
                .await?
        } else {
            None
        };

        LedgerService::validate_edit(&current, &patch, actor, today, &validator, |_| Ok(prior))?;

        let pair = spawn_version(&current, actor.user_id, now)
            .map_err(|e| LedgerError::Database(format!("version chain rejected the edit: {e}")))?;
        let mut next = patch.applied_to(&pair.next);
        next.edit_reason = patch.edit_reason.clone();

        let mut retired: ledger_entries::ActiveModel = current_row.into();
        retired.is_active = Set(false);
        retired.updated_by = Set(pair.retired.updated_by.map(UserId::into_inner));
        retired.updated_at = Set(pair.retired.updated_at.into());
        retired
            .update(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        entry_to_active_model(&next)
            .insert(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let attachment_keys = match &patch.attachment_keys {
            Some(keys) => {
                replace_attachment_keys(&txn, original_id, keys, actor.user_id.into_inner()).await?
            }
            None => attachment_keys_for(&txn, original_id).await?,
        };

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        tracing::debug!(
            entry_id = %next.id,
            version = next.version_number,
            "ledger entry superseded"
        );

        Ok(EntryWithAttachments {
            entry: next,
            attachment_keys,
        })
    }

    /// Soft-deletes the active version of a chain.
    ///
    /// Pending entries may be deleted by their creator or an elevated role;
    /// entries in any other status require an elevated role. The active row
    /// is stamped with `deleted_by` and `deleted_at` and stays active, so
    /// the chain keeps exactly one tip. Deletion is terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is unknown, already deleted, the actor
    /// is not allowed to delete it, or a database operation fails.
    pub async fn delete_entry(
        &self,
        entry_id: EntryId,
        actor: &Actor,
    ) -> Result<LedgerEntry, LedgerError> {
        let original_id = self.resolve_original(entry_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let current_row = lock_active(&txn, original_id, entry_id).await?;
        let current = model_to_entry(current_row.clone());

        LedgerService::validate_delete(&current, actor)?;

        let now = Utc::now();
        let mut active: ledger_entries::ActiveModel = current_row.into();
        active.deleted_by = Set(Some(actor.user_id.into_inner()));
        active.deleted_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        tracing::debug!(entry_id = %entry_id, "ledger entry soft-deleted");

        Ok(model_to_entry(updated))
    }

    /// Soft-deletes several entries, isolating failures per entry.
    ///
    /// Each entry is deleted independently; one failure does not roll back
    /// the others. The result carries per-entry outcomes in request order.
    ///
    /// # Errors
    ///
    /// Per-entry failures are captured in the result rather than returned.
    pub async fn bulk_delete(
        &self,
        entry_ids: Vec<EntryId>,
        actor: &Actor,
    ) -> Result<BulkDeleteResult, LedgerError> {
        let mut results = Vec::with_capacity(entry_ids.len());
        let mut success_count = 0;
        let mut failure_count = 0;

        for entry_id in entry_ids {
            match self.delete_entry(entry_id, actor).await {
                Ok(_) => {
                    success_count += 1;
                    results.push(BulkDeleteItemResult {
                        entry_id,
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    failure_count += 1;
                    results.push(BulkDeleteItemResult {
                        entry_id,
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(BulkDeleteResult {
            results,
            success_count,
            failure_count,
        })
    }

    /// Resolves any version id to its chain's `original_entry_id`.
    async fn resolve_original(&self, entry_id: EntryId) -> Result<Uuid, LedgerError> {
        let row = ledger_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        Ok(row.original_entry_id)
    }

    /// Builds a validator over the currently configured allow-lists.
    async fn reference_validator(&self) -> Result<ReferenceValidator<ReferenceLists>, LedgerError> {
        let lists = self.settings.reference_lists().await?;
        Ok(ReferenceValidator::new(lists, self.lookback_days))
    }
}

// ============================================================================
// Chain query helpers
// ============================================================================

/// Locks the chain through its root row, then reads the active version.
///
/// Serializes concurrent mutations of one chain; the second writer blocks
/// here until the first commits, then sees the new tip. The lock targets
/// the root row because its id never changes: a `FOR UPDATE` on the
/// `is_active` predicate would come back empty for a waiter whose row got
/// retired while it was blocked.
async fn lock_active(
    txn: &DatabaseTransaction,
    original_id: Uuid,
    requested: EntryId,
) -> Result<ledger_entries::Model, LedgerError> {
    ledger_entries::Entity::find_by_id(original_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?
        .ok_or(LedgerError::EntryNotFound(requested))?;

    ledger_entries::Entity::find()
        .filter(ledger_entries::Column::OriginalEntryId.eq(original_id))
        .filter(ledger_entries::Column::IsActive.eq(true))
        .one(txn)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?
        .ok_or(LedgerError::EntryNotFound(requested))
}

/// Finds the latest approved odometer reading for a subject.
///
/// Orders by entry date, then reading, descending, over active approved
/// rows that are not soft-deleted. `exclude_chain` leaves the chain being
/// written out of consideration so an edit is not compared against itself.
async fn latest_approved_reading<C: ConnectionTrait>(
    conn: &C,
    subject_id: Uuid,
    exclude_chain: Option<Uuid>,
) -> Result<Option<PriorReading>, LedgerError> {
    let mut query = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::SubjectId.eq(subject_id))
        .filter(ledger_entries::Column::IsActive.eq(true))
        .filter(ledger_entries::Column::DeletedAt.is_null())
        .filter(ledger_entries::Column::ApprovalStatus.eq(DbApprovalStatus::Approved))
        .filter(ledger_entries::Column::Odometer.is_not_null());

    if let Some(chain) = exclude_chain {
        query = query.filter(ledger_entries::Column::OriginalEntryId.ne(chain));
    }

    let row = query
        .order_by_desc(ledger_entries::Column::EntryDate)
        .order_by_desc(ledger_entries::Column::Odometer)
        .limit(1)
        .one(conn)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

    Ok(row.and_then(|m| {
        m.odometer.map(|odometer| PriorReading {
            entry_id: EntryId::from_uuid(m.id),
            entry_date: m.entry_date,
            odometer,
        })
    }))
}

/// Replaces the chain's attachment keys with the given list.
///
/// Keys are deduplicated preserving first occurrence. Returns the stored
/// list.
async fn replace_attachment_keys(
    txn: &DatabaseTransaction,
    original_id: Uuid,
    keys: &[String],
    uploaded_by: Uuid,
) -> Result<Vec<String>, LedgerError> {
    entry_attachments::Entity::delete_many()
        .filter(entry_attachments::Column::OriginalEntryId.eq(original_id))
        .exec(txn)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

    let now = Utc::now();
    let mut seen = HashSet::new();
    let mut stored = Vec::with_capacity(keys.len());

    for key in keys {
        if !seen.insert(key.as_str()) {
            continue;
        }

        let row = entry_attachments::ActiveModel {
            id: Set(AttachmentId::new().into_inner()),
            original_entry_id: Set(original_id),
            file_key: Set(key.clone()),
            uploaded_by: Set(uploaded_by),
            created_at: Set(now.into()),
        };
        row.insert(txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        stored.push(key.clone());
    }

    Ok(stored)
}

/// Loads the chain's attachment keys in upload order.
///
/// Rows written in one batch share a timestamp; the time-ordered id
/// breaks the tie.
async fn attachment_keys_for<C: ConnectionTrait>(
    conn: &C,
    original_id: Uuid,
) -> Result<Vec<String>, LedgerError> {
    let rows = entry_attachments::Entity::find()
        .filter(entry_attachments::Column::OriginalEntryId.eq(original_id))
        .order_by_asc(entry_attachments::Column::CreatedAt)
        .order_by_asc(entry_attachments::Column::Id)
        .all(conn)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

    Ok(rows.into_iter().map(|r| r.file_key).collect())
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts a stored row into the core entry record.
#[must_use]
pub fn model_to_entry(model: ledger_entries::Model) -> LedgerEntry {
    LedgerEntry {
        id: EntryId::from_uuid(model.id),
        original_entry_id: EntryId::from_uuid(model.original_entry_id),
        parent_entry_id: model.parent_entry_id.map(EntryId::from_uuid),
        version_number: model.version_number,
        is_active: model.is_active,
        kind: db_kind_to_core(&model.kind),
        transaction_type: db_transaction_type_to_core(&model.transaction_type),
        amount: model.amount,
        entry_date: model.entry_date,
        category: model.category,
        payment_mode: model.payment_mode,
        description: model.description,
        odometer: model.odometer,
        subject_id: SubjectId::from_uuid(model.subject_id),
        origin: db_origin_to_core(&model.origin),
        approval_status: db_status_to_core(&model.approval_status),
        approved_by: model.approved_by.map(UserId::from_uuid),
        approved_at: model.approved_at.map(|t| t.with_timezone(&Utc)),
        approval_reason: model.approval_reason,
        edit_reason: model.edit_reason,
        created_by: UserId::from_uuid(model.created_by),
        created_at: model.created_at.with_timezone(&Utc),
        updated_by: model.updated_by.map(UserId::from_uuid),
        updated_at: model.updated_at.with_timezone(&Utc),
        deleted_by: model.deleted_by.map(UserId::from_uuid),
        deleted_at: model.deleted_at.map(|t| t.with_timezone(&Utc)),
    }
}

/// Converts a core entry into an active model with every column set.
#[must_use]
pub fn entry_to_active_model(entry: &LedgerEntry) -> ledger_entries::ActiveModel {
    ledger_entries::ActiveModel {
        id: Set(entry.id.into_inner()),
        original_entry_id: Set(entry.original_entry_id.into_inner()),
        parent_entry_id: Set(entry.parent_entry_id.map(EntryId::into_inner)),
        version_number: Set(entry.version_number),
        is_active: Set(entry.is_active),
        kind: Set(core_kind_to_db(entry.kind)),
        transaction_type: Set(core_transaction_type_to_db(entry.transaction_type)),
        amount: Set(entry.amount),
        entry_date: Set(entry.entry_date),
        category: Set(entry.category.clone()),
        payment_mode: Set(entry.payment_mode.clone()),
        description: Set(entry.description.clone()),
        odometer: Set(entry.odometer),
        subject_id: Set(entry.subject_id.into_inner()),
        origin: Set(core_origin_to_db(entry.origin)),
        approval_status: Set(core_status_to_db(entry.approval_status)),
        approved_by: Set(entry.approved_by.map(UserId::into_inner)),
        approved_at: Set(entry.approved_at.map(Into::into)),
        approval_reason: Set(entry.approval_reason.clone()),
        edit_reason: Set(entry.edit_reason.clone()),
        created_by: Set(entry.created_by.into_inner()),
        created_at: Set(entry.created_at.into()),
        updated_by: Set(entry.updated_by.map(UserId::into_inner)),
        updated_at: Set(entry.updated_at.into()),
        deleted_by: Set(entry.deleted_by.map(UserId::into_inner)),
        deleted_at: Set(entry.deleted_at.map(Into::into)),
    }
}

/// Converts a database ledger kind to the core kind.
#[must_use]
pub fn db_kind_to_core(kind: &DbLedgerKind) -> LedgerKind {
    match kind {
        DbLedgerKind::Expense => LedgerKind::Expense,
        DbLedgerKind::Fuel => LedgerKind::Fuel,
    }
}

/// Converts a core ledger kind to the database kind.
#[must_use]
pub fn core_kind_to_db(kind: LedgerKind) -> DbLedgerKind {
    match kind {
        LedgerKind::Expense => DbLedgerKind::Expense,
        LedgerKind::Fuel => DbLedgerKind::Fuel,
    }
}

/// Converts a database transaction type to the core type.
#[must_use]
pub fn db_transaction_type_to_core(transaction_type: &DbTransactionType) -> TransactionType {
    match transaction_type {
        DbTransactionType::Credit => TransactionType::Credit,
        DbTransactionType::Debit => TransactionType::Debit,
    }
}

/// Converts a core transaction type to the database type.
#[must_use]
pub fn core_transaction_type_to_db(transaction_type: TransactionType) -> DbTransactionType {
    match transaction_type {
        TransactionType::Credit => DbTransactionType::Credit,
        TransactionType::Debit => DbTransactionType::Debit,
    }
}

/// Converts a database entry origin to the core origin.
#[must_use]
pub fn db_origin_to_core(origin: &DbEntryOrigin) -> EntryOrigin {
    match origin {
        DbEntryOrigin::Manual => EntryOrigin::Manual,
        DbEntryOrigin::Forced => EntryOrigin::Forced,
        DbEntryOrigin::Settlement => EntryOrigin::Settlement,
    }
}

/// Converts a core entry origin to the database origin.
#[must_use]
pub fn core_origin_to_db(origin: EntryOrigin) -> DbEntryOrigin {
    match origin {
        EntryOrigin::Manual => DbEntryOrigin::Manual,
        EntryOrigin::Forced => DbEntryOrigin::Forced,
        EntryOrigin::Settlement => DbEntryOrigin::Settlement,
    }
}

/// Converts a database approval status to the core status.
#[must_use]
pub fn db_status_to_core(status: &DbApprovalStatus) -> ApprovalStatus {
    match status {
        DbApprovalStatus::Pending => ApprovalStatus::Pending,
        DbApprovalStatus::Approved => ApprovalStatus::Approved,
        DbApprovalStatus::Rejected => ApprovalStatus::Rejected,
        DbApprovalStatus::Cancelled => ApprovalStatus::Cancelled,
    }
}

/// Converts a core approval status to the database status.
#[must_use]
pub fn core_status_to_db(status: ApprovalStatus) -> DbApprovalStatus {
    match status {
        ApprovalStatus::Pending => DbApprovalStatus::Pending,
        ApprovalStatus::Approved => DbApprovalStatus::Approved,
        ApprovalStatus::Rejected => DbApprovalStatus::Rejected,
        ApprovalStatus::Cancelled => DbApprovalStatus::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_input(subject_id: SubjectId) -> CreateEntryInput {
        CreateEntryInput {
            kind: LedgerKind::Fuel,
            transaction_type: TransactionType::Debit,
            amount: dec!(64.50),
            entry_date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            category: "FUEL".to_string(),
            payment_mode: "CARD".to_string(),
            description: Some("Diesel top-up".to_string()),
            odometer: Some(dec!(42100.5)),
            subject_id,
            origin: EntryOrigin::Manual,
            attachment_keys: vec!["receipts/2026/08/0001.jpg".to_string()],
        }
    }

    #[test]
    fn test_status_conversion_round_trips() {
        for status in ApprovalStatus::ALL {
            assert_eq!(db_status_to_core(&core_status_to_db(status)), status);
        }
    }

    #[test]
    fn test_kind_and_type_conversions_round_trip() {
        for kind in [LedgerKind::Expense, LedgerKind::Fuel] {
            assert_eq!(db_kind_to_core(&core_kind_to_db(kind)), kind);
        }
        for transaction_type in [TransactionType::Credit, TransactionType::Debit] {
            assert_eq!(
                db_transaction_type_to_core(&core_transaction_type_to_db(transaction_type)),
                transaction_type
            );
        }
        for origin in [
            EntryOrigin::Manual,
            EntryOrigin::Forced,
            EntryOrigin::Settlement,
        ] {
            assert_eq!(db_origin_to_core(&core_origin_to_db(origin)), origin);
        }
    }

    #[test]
    fn test_entry_to_active_model_sets_every_identity_column() {
        let creator = UserId::new();
        let entry = root_version(&sample_input(SubjectId::new()), creator, Utc::now());
        let active = entry_to_active_model(&entry);

        assert_eq!(active.id.clone().unwrap(), entry.id.into_inner());
        assert_eq!(
            active.original_entry_id.clone().unwrap(),
            entry.id.into_inner()
        );
        assert_eq!(active.parent_entry_id.clone().unwrap(), None);
        assert_eq!(active.version_number.clone().unwrap(), 1);
        assert!(active.is_active.clone().unwrap());
        assert_eq!(active.amount.clone().unwrap(), dec!(64.50));
        assert_eq!(active.created_by.clone().unwrap(), creator.into_inner());
    }

    #[test]
    fn test_model_round_trip_through_active_model() {
        let entry = root_version(&sample_input(SubjectId::new()), UserId::new(), Utc::now());
        let model = ledger_entries::Model {
            id: entry.id.into_inner(),
            original_entry_id: entry.original_entry_id.into_inner(),
            parent_entry_id: None,
            version_number: entry.version_number,
            is_active: entry.is_active,
            kind: core_kind_to_db(entry.kind),
            transaction_type: core_transaction_type_to_db(entry.transaction_type),
            amount: entry.amount,
            entry_date: entry.entry_date,
            category: entry.category.clone(),
            payment_mode: entry.payment_mode.clone(),
            description: entry.description.clone(),
            odometer: entry.odometer,
            subject_id: entry.subject_id.into_inner(),
            origin: core_origin_to_db(entry.origin),
            approval_status: core_status_to_db(entry.approval_status),
            approved_by: None,
            approved_at: None,
            approval_reason: None,
            edit_reason: None,
            created_by: entry.created_by.into_inner(),
            created_at: entry.created_at.into(),
            updated_by: None,
            updated_at: entry.updated_at.into(),
            deleted_by: None,
            deleted_at: None,
        };

        let mapped = model_to_entry(model);
        assert_eq!(mapped, entry);
    }

    #[tokio::test]
    async fn test_known_subjects_contains_only_registered_ids() {
        let subject_id = SubjectId::new();
        let registry = KnownSubjects::new([subject_id]);

        assert!(registry.subject_exists(subject_id).await.unwrap());
        assert!(!registry.subject_exists(SubjectId::new()).await.unwrap());
    }
}
