//! Reconciliation repository for filtered listings and balance aggregates.
//!
//! One call answers both questions a ledger view asks: which entries match
//! the filter (paginated, sorted) and what the money did over that window
//! (opening balance, period totals, closing balance, approval counts). The
//! aggregates are computed over the full window, never over the requested
//! page, so paging through results cannot skew totals.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use tallix_core::ledger::{
    BalanceSummary, EntryFilter, EntrySort, LedgerEntry, LedgerError, SortDirection,
};
use tallix_shared::types::{PageRequest, PageResponse};

use crate::entities::ledger_entries;
use crate::entities::sea_orm_active_enums::ApprovalStatus as DbApprovalStatus;

use super::ledger::{core_kind_to_db, core_status_to_db, model_to_entry};

/// A reconciled view over the filtered window.
#[derive(Debug, Clone)]
pub struct ReconciliationResult {
    /// The requested page of matching active entries.
    pub records: PageResponse<LedgerEntry>,
    /// Aggregates over the whole window, independent of pagination.
    pub summary: BalanceSummary,
}

/// Reconciliation repository for point-in-time balance queries.
#[derive(Debug, Clone)]
pub struct ReconcileRepository {
    db: DatabaseConnection,
}

impl ReconcileRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists matching entries and computes the window's balance aggregates.
    ///
    /// Only active, non-deleted versions participate. The record list
    /// honors the full filter including the status set; the balance math is
    /// intrinsic to the window: opening balance and period totals always
    /// sum approved entries only, and the approval counts bucket every
    /// non-cancelled status inside the window regardless of the status
    /// filter, so a status-restricted view still reports the true balance.
    ///
    /// The opening balance covers approved entries strictly before the
    /// window's lower date bound; without a lower bound it is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn reconcile(
        &self,
        filter: &EntryFilter,
        page: PageRequest,
    ) -> Result<ReconciliationResult, LedgerError> {
        let page = page.clamped();

        let window = window_query(filter);
        let records_query = status_filtered(window.clone(), filter);

        let total = records_query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let rows = sorted(records_query, filter)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        let records: Vec<LedgerEntry> = rows.into_iter().map(model_to_entry).collect();

        let window_rows = window
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        let window: Vec<LedgerEntry> = window_rows.into_iter().map(model_to_entry).collect();

        let opening = if let Some(floor) = filter.date_from {
            let rows = opening_query(filter, floor)
                .all(&self.db)
                .await
                .map_err(|e| LedgerError::Database(e.to_string()))?;
            rows.into_iter().map(model_to_entry).collect()
        } else {
            Vec::new()
        };

        let summary = BalanceSummary::compute(&opening, &window);

        Ok(ReconciliationResult {
            records: PageResponse::new(records, page.page, page.per_page, total),
            summary,
        })
    }
}

// ============================================================================
// Query builders
// ============================================================================

/// Builds the window query: scope and date filters over active rows.
fn window_query(filter: &EntryFilter) -> Select<ledger_entries::Entity> {
    let mut query = scoped(
        ledger_entries::Entity::find()
            .filter(ledger_entries::Column::IsActive.eq(true))
            .filter(ledger_entries::Column::DeletedAt.is_null()),
        filter,
    );

    if let Some(date_from) = filter.date_from {
        query = query.filter(ledger_entries::Column::EntryDate.gte(date_from));
    }
    if let Some(date_to) = filter.date_to {
        query = query.filter(ledger_entries::Column::EntryDate.lte(date_to));
    }

    query
}

/// Builds the opening-balance query: approved scope rows strictly before
/// the window's lower bound.
fn opening_query(
    filter: &EntryFilter,
    floor: chrono::NaiveDate,
) -> Select<ledger_entries::Entity> {
    scoped(
        ledger_entries::Entity::find()
            .filter(ledger_entries::Column::IsActive.eq(true))
            .filter(ledger_entries::Column::DeletedAt.is_null())
            .filter(ledger_entries::Column::ApprovalStatus.eq(DbApprovalStatus::Approved))
            .filter(ledger_entries::Column::EntryDate.lt(floor)),
        filter,
    )
}

/// Applies the non-date scope filters: kind, subjects, and search.
fn scoped(
    mut query: Select<ledger_entries::Entity>,
    filter: &EntryFilter,
) -> Select<ledger_entries::Entity> {
    if let Some(kind) = filter.kind {
        query = query.filter(ledger_entries::Column::Kind.eq(core_kind_to_db(kind)));
    }

    if !filter.subject_ids.is_empty() {
        let ids: Vec<Uuid> = filter
            .subject_ids
            .iter()
            .map(|subject_id| subject_id.into_inner())
            .collect();
        query = query.filter(ledger_entries::Column::SubjectId.is_in(ids));
    }

    if let Some(term) = &filter.search {
        let pattern = search_pattern(term);
        query = query.filter(
            Condition::any()
                .add(Expr::col(ledger_entries::Column::Description).ilike(pattern.clone()))
                .add(Expr::col(ledger_entries::Column::Category).ilike(pattern)),
        );
    }

    query
}

/// Restricts to the filter's status set, when one is given.
fn status_filtered(
    query: Select<ledger_entries::Entity>,
    filter: &EntryFilter,
) -> Select<ledger_entries::Entity> {
    if filter.statuses.is_empty() {
        return query;
    }

    let statuses: Vec<DbApprovalStatus> = filter
        .statuses
        .iter()
        .map(|status| core_status_to_db(*status))
        .collect();
    query.filter(ledger_entries::Column::ApprovalStatus.is_in(statuses))
}

/// Applies the filter's sort key with a stable created-at tiebreak.
fn sorted(
    query: Select<ledger_entries::Entity>,
    filter: &EntryFilter,
) -> Select<ledger_entries::Entity> {
    let mut query = query.order_by(sort_column(filter.sort), sort_order(filter.direction));
    if filter.sort != EntrySort::CreatedAt {
        query = query.order_by_desc(ledger_entries::Column::CreatedAt);
    }
    query
}

/// Maps a sort key to its column.
fn sort_column(sort: EntrySort) -> ledger_entries::Column {
    match sort {
        EntrySort::EntryDate => ledger_entries::Column::EntryDate,
        EntrySort::Amount => ledger_entries::Column::Amount,
        EntrySort::CreatedAt => ledger_entries::Column::CreatedAt,
    }
}

/// Maps a sort direction to a query order.
fn sort_order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/// Builds a LIKE pattern for substring search, escaping wildcards.
fn search_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
