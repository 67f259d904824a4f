//! Versioned ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Entry types and the version-chain record
//! - Version chain maintenance (supersession, integrity checks)
//! - Reference validation against configured allow-lists
//! - Per-kind domain rules (odometer shape, monotonic readings)
//! - Balance reconciliation aggregates
//! - Error types for ledger operations
//! - Ledger service composing the validation steps

pub mod chain;
pub mod error;
pub mod reconcile;
pub mod rules;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod chain_props;

pub use chain::{root_version, spawn_version, verify, ChainError, VersionPair};
pub use error::LedgerError;
pub use reconcile::{
    ApprovalCounts, BalanceSummary, EntryFilter, EntrySort, SortDirection,
};
pub use rules::{check_monotonic, validate_amount, validate_kind_shape, PriorReading};
pub use service::LedgerService;
pub use types::{
    CreateEntryInput, EntryOrigin, EntryPatch, LedgerEntry, LedgerKind, TransactionType,
};
pub use validation::{ReferenceDataProvider, ReferenceLists, ReferenceValidator};
