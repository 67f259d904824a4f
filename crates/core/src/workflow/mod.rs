//! Entry approval workflow for Tallix.
//!
//! This module implements the approval lifecycle state machine shared by
//! every ledger kind.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (ApprovalStatus, TransitionAction)
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::WorkflowService;
pub use types::{ApprovalStatus, TransitionAction, TransitionOutcome};
