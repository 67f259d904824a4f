//! Common types used across the application.

pub mod actor;
pub mod id;
pub mod pagination;

pub use actor::{Actor, ActorRole};
pub use id::*;
pub use pagination::{PageMeta, PageRequest, PageResponse};
