//! Port persisting and querying in-app notifications.
use async_trait::async_trait;

use crate::domain::notification::{InAppNotification, NotificationKind};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification repository adapters.
    pub enum NotificationStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification store query failed: {message}",
    }
}

/// Insertable in-app notification row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInAppNotification {
    /// Owning user.
    pub user_id: i32,
    /// Short headline.
    pub title: String,
    /// Full message body.
    pub message: String,
    /// Severity category, already coerced onto the closed set.
    pub kind: NotificationKind,
}

/// Durable store for in-app notification rows.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert a notification and return its row id.
    async fn insert(
        &self,
        notification: NewInAppNotification,
    ) -> Result<i32, NotificationStoreError>;

    /// List a user's notifications, newest first.
    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<InAppNotification>, NotificationStoreError>;

    /// Mark one notification read; returns false when the row is missing.
    async fn mark_read(&self, notification_id: i32) -> Result<bool, NotificationStoreError>;

    /// Mark all of a user's notifications read; returns the affected count.
    async fn mark_all_read(&self, user_id: i32) -> Result<u64, NotificationStoreError>;
}
