//! Shared types and configuration for Tallix.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list queries
//! - The acting-user context threaded through every ledger call
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{Actor, ActorRole};
