//! Database layer with `SeaORM` entities and ledger repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the versioned ledger tables
//! - Repository abstractions for entry, workflow, reconciliation and
//!   reference-data access
//! - Database migrations
//!
//! All monetary values are `rust_decimal::Decimal` end to end; nothing in
//! this crate converts an amount through a float.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    KnownSubjects, LedgerRepository, ReconcileRepository, SettingsRepository, SubjectRegistry,
    WorkflowRepository,
};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tallix_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a connection honoring the pool limits from [`DatabaseConfig`].
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10));
    Database::connect(options).await
}
