//! `SeaORM` Entity for the `ledger_entries` table.
//!
//! One row per version; versions of one logical entry share
//! `original_entry_id` and exactly one row per chain has `is_active = true`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ApprovalStatus, EntryOrigin, LedgerKind, TransactionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub original_entry_id: Uuid,
    pub parent_entry_id: Option<Uuid>,
    pub version_number: i32,
    pub is_active: bool,
    pub kind: LedgerKind,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub entry_date: Date,
    pub category: String,
    pub payment_mode: String,
    pub description: Option<String>,
    pub odometer: Option<Decimal>,
    pub subject_id: Uuid,
    pub origin: EntryOrigin,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub approval_reason: Option<String>,
    pub edit_reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
