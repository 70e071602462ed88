//! PostgreSQL-backed `NotificationRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::notification::InAppNotification;
use crate::domain::ports::{
    NewInAppNotification, NotificationRepository, NotificationStoreError,
};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationStoreError {
    NotificationStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationStoreError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => NotificationStoreError::connection(error.to_string()),
        DbFailure::Query | DbFailure::UniqueViolation => {
            NotificationStoreError::query(error.to_string())
        }
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: NewInAppNotification,
    ) -> Result<i32, NotificationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewNotificationRow {
            user_id: notification.user_id,
            title: &notification.title,
            message: &notification.message,
            // The column is CHECK-constrained; the kind arrives pre-coerced
            // as a closed enum, so this cannot violate it.
            kind: notification.kind.as_str(),
        };
        diesel::insert_into(notifications::table)
            .values(&row)
            .returning(notifications::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<InAppNotification>, NotificationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load::<NotificationRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(InAppNotification::from).collect())
    }

    async fn mark_read(&self, notification_id: i32) -> Result<bool, NotificationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(notifications::table.find(notification_id))
            .set(notifications::is_read.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn mark_all_read(&self, user_id: i32) -> Result<u64, NotificationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::is_read.eq(false)),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated as u64)
    }
}
