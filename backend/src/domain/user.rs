//! User entities and recipient resolution types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role assigned to an academy account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office administrator.
    Admin,
    /// Teaching staff.
    Teacher,
    /// Enrolled student.
    Student,
}

impl Role {
    /// Database representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    /// Parse a database value, defaulting unrecognised values to `Student`.
    ///
    /// Rows predating the role column carry free-form values; treating them
    /// as students keeps broadcasts conservative (students never receive
    /// admin-only traffic by accident, the reverse is harmless).
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "teacher" => Self::Teacher,
            _ => Self::Student,
        }
    }
}

/// Activation status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is active and receives notifications.
    Active,
    /// Account is disabled; excluded from recipient resolution.
    Inactive,
}

impl UserStatus {
    /// Database representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parse a database value, defaulting unrecognised values to `Inactive`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            _ => Self::Inactive,
        }
    }
}

/// Academy account as exposed by the API (credentials omitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Row identifier.
    pub id: i32,
    /// Full name.
    pub name: String,
    /// Contact email, unique among non-deleted accounts.
    pub email: String,
    /// Assigned role.
    pub role: Role,
    /// Activation status.
    pub status: UserStatus,
}

/// Read-only snapshot of a notification recipient.
///
/// Taken once per fan-out event; never mutated by the fan-out itself.
/// Recipients without an account (`user_id = None`, e.g. demo-class
/// prospects) can only be reached over email: the in-app and push channels
/// require a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// User row identifier; `None` for addressees without an account.
    pub user_id: Option<i32>,
    /// Full name used in salutations.
    pub name: String,
    /// Destination address for the email channel.
    pub email: String,
}

/// Caller-selected recipient resolution policy for one fan-out event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSelector {
    /// Explicit user ids; deleted accounts are filtered out.
    Ids(Vec<i32>),
    /// All active, non-deleted users holding the given role.
    Role(Role),
    /// All active, non-deleted, non-admin users.
    Broadcast,
    /// A single addressee without an account, reached over email only.
    External {
        /// Display name for salutations.
        name: String,
        /// Destination address.
        email: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("teacher", Role::Teacher)]
    #[case("student", Role::Student)]
    #[case("principal", Role::Student)]
    fn role_round_trips_known_values(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(Role::from_db(raw), expected);
    }

    #[rstest]
    #[case("active", UserStatus::Active)]
    #[case("inactive", UserStatus::Inactive)]
    #[case("suspended", UserStatus::Inactive)]
    fn status_defaults_to_inactive(#[case] raw: &str, #[case] expected: UserStatus) {
        assert_eq!(UserStatus::from_db(raw), expected);
    }
}
