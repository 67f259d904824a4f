//! Core ledger logic for Tallix.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Versioned entry chains, reference validation, domain rules,
//!   balance reconciliation
//! - `workflow` - The approval state machine

pub mod ledger;
pub mod workflow;
