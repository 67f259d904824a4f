//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where an `EntryId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(
    EntryId,
    "Unique identifier for one version row of a ledger entry."
);
typed_id!(
    SubjectId,
    "Unique identifier for the subject an entry belongs to (vehicle, card, ...)."
);
typed_id!(AttachmentId, "Unique identifier for an attachment record.");

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn new_ids_are_unique() {
        let a = EntryId::new();
        let b = EntryId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_display_and_parse() {
        let id = SubjectId::new();
        let parsed = SubjectId::from_str(&id.to_string()).expect("valid uuid string");
        assert_eq!(id, parsed);
    }

    #[test]
    fn serde_is_transparent() {
        let id = UserId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", Uuid::nil()));
    }
}
