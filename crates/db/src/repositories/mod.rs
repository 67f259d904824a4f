//! Repository abstractions for ledger data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod ledger;
pub mod reconcile;
pub mod settings;
pub mod workflow;

pub use ledger::{
    BulkDeleteItemResult, BulkDeleteResult, EntryWithAttachments, KnownSubjects, LedgerRepository,
    SubjectRegistry,
};
pub use reconcile::{ReconcileRepository, ReconciliationResult};
pub use settings::{SettingsRepository, CATEGORIES_KEY, PAYMENT_MODES_KEY};
pub use workflow::{
    BulkTransitionItemResult, BulkTransitionResult, TransitionRequest, TransitionResult,
    WorkflowRepository,
};
