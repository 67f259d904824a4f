//! Acting-user context threaded through every ledger call.
//!
//! Identity and timezone travel as explicit parameters. Nothing in the
//! ledger reads ambient or thread-local request state.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Role of the acting user, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    /// Regular user: creates and edits own entries.
    Member,
    /// Supervisor: may also delete non-pending entries.
    Supervisor,
    /// Administrator: full ledger maintenance.
    Admin,
}

impl ActorRole {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Supervisor => "supervisor",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from its string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "supervisor" => Some(Self::Supervisor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Whether this role may act beyond its own pending entries,
    /// e.g. delete an entry that is no longer PENDING.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        *self >= Self::Supervisor
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user on whose behalf a ledger operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Identity of the acting user.
    pub user_id: UserId,
    /// Privilege level.
    pub role: ActorRole,
    /// Timezone in which "today" is evaluated for this user.
    pub timezone: Tz,
}

impl Actor {
    /// Creates an actor context.
    #[must_use]
    pub const fn new(user_id: UserId, role: ActorRole, timezone: Tz) -> Self {
        Self {
            user_id,
            role,
            timezone,
        }
    }

    /// The calendar date of `at` in this actor's timezone.
    #[must_use]
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.timezone).date_naive()
    }
}
