//! In-app notification types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Severity category of an in-app notification.
///
/// The `notifications.kind` column carries a CHECK constraint over exactly
/// these four values; [`NotificationKind::coerce`] must be applied to any
/// free-form input before insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum NotificationKind {
    /// Neutral informational notice.
    Info,
    /// Something needs the user's attention.
    Warning,
    /// A positive confirmation (payment received, enrolment confirmed).
    Success,
    /// A failure the user should know about.
    Error,
}

impl NotificationKind {
    /// Database representation of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Success => "Success",
            Self::Error => "Error",
        }
    }

    /// Coerce a free-form value onto the closed set, defaulting to `Info`.
    pub fn coerce(value: &str) -> Self {
        match value {
            "Warning" => Self::Warning,
            "Success" => Self::Success,
            "Error" => Self::Error,
            _ => Self::Info,
        }
    }
}

/// Persisted in-app notification as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InAppNotification {
    /// Row identifier.
    pub id: i32,
    /// Owning user.
    pub user_id: i32,
    /// Short headline.
    pub title: String,
    /// Full message body.
    pub message: String,
    /// Severity category.
    pub kind: NotificationKind,
    /// Whether the user has opened the notification.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
