//! PostgreSQL-backed `PushTokenRepository` adapter.
//!
//! Registration is an upsert on `(user_id, fcm_token)`: re-registering a
//! token that was previously soft-deactivated flips it back to active.
//! Deactivation never deletes the row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PushTokenRepository, PushTokenStoreError};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::pool::{DbPool, PoolError};
use super::schema::fcm_tokens;

/// Diesel-backed implementation of the `PushTokenRepository` port.
#[derive(Clone)]
pub struct DieselPushTokenRepository {
    pool: DbPool,
}

impl DieselPushTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PushTokenStoreError {
    PushTokenStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> PushTokenStoreError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => PushTokenStoreError::connection(error.to_string()),
        DbFailure::Query | DbFailure::UniqueViolation => {
            PushTokenStoreError::query(error.to_string())
        }
    }
}

#[async_trait]
impl PushTokenRepository for DieselPushTokenRepository {
    async fn active_tokens(&self, user_id: i32) -> Result<Vec<String>, PushTokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        fcm_tokens::table
            .filter(fcm_tokens::user_id.eq(user_id))
            .filter(fcm_tokens::is_active.eq(true))
            .select(fcm_tokens::fcm_token)
            .load::<String>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn upsert(
        &self,
        user_id: i32,
        token: &str,
        device_type: &str,
    ) -> Result<(), PushTokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(fcm_tokens::table)
            .values((
                fcm_tokens::user_id.eq(user_id),
                fcm_tokens::fcm_token.eq(token),
                fcm_tokens::device_type.eq(device_type),
                fcm_tokens::is_active.eq(true),
            ))
            .on_conflict((fcm_tokens::user_id, fcm_tokens::fcm_token))
            .do_update()
            .set((
                fcm_tokens::is_active.eq(true),
                fcm_tokens::device_type.eq(device_type),
                fcm_tokens::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn deactivate(&self, user_id: i32, token: &str) -> Result<bool, PushTokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            fcm_tokens::table
                .filter(fcm_tokens::user_id.eq(user_id))
                .filter(fcm_tokens::fcm_token.eq(token)),
        )
        .set((
            fcm_tokens::is_active.eq(false),
            fcm_tokens::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
