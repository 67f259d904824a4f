//! `SeaORM` entity definitions for the ledger schema.

pub mod entry_attachments;
pub mod ledger_entries;
pub mod ledger_settings;
pub mod sea_orm_active_enums;
