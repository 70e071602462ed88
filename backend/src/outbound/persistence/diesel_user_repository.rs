//! PostgreSQL-backed `UserRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUser, UserRepository, UserStoreError};
use crate::domain::user::User;

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserStoreError {
    UserStoreError::connection(error.to_string())
}

fn map_diesel_error(email: &str, error: diesel::result::Error) -> UserStoreError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => UserStoreError::connection(error.to_string()),
        DbFailure::UniqueViolation => UserStoreError::duplicate_email(email),
        DbFailure::Query => UserStoreError::query(error.to_string()),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            name: &user.name,
            email: &user.email,
            password_hash: &user.password_hash,
            role: user.role.as_str(),
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&user.email, err))?;
        Ok(stored.into())
    }

    async fn list_active(&self) -> Result<Vec<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .filter(users::is_deleted.eq(false))
            .filter(users::status.eq("active"))
            .order(users::name.asc())
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(&err) {
                DbFailure::Connection => UserStoreError::connection(err.to_string()),
                DbFailure::Query | DbFailure::UniqueViolation => {
                    UserStoreError::query(err.to_string())
                }
            })?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
