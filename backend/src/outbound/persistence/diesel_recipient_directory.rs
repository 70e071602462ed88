//! PostgreSQL-backed `RecipientDirectory` adapter.
//!
//! Resolution policies mirror the fan-out contract: explicit id lists only
//! exclude deleted accounts, role selection adds the active-status filter,
//! and broadcast additionally excludes admins.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecipientDirectory, RecipientLookupError};
use crate::domain::user::{Recipient, RecipientSelector, Role};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::models::RecipientRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `RecipientDirectory` port.
#[derive(Clone)]
pub struct DieselRecipientDirectory {
    pool: DbPool,
}

impl DieselRecipientDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipientLookupError {
    RecipientLookupError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> RecipientLookupError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => RecipientLookupError::connection(error.to_string()),
        DbFailure::Query | DbFailure::UniqueViolation => {
            RecipientLookupError::query(error.to_string())
        }
    }
}

#[async_trait]
impl RecipientDirectory for DieselRecipientDirectory {
    async fn resolve(
        &self,
        selector: &RecipientSelector,
    ) -> Result<Vec<Recipient>, RecipientLookupError> {
        // External addressees carry their own contact details; no lookup.
        if let RecipientSelector::External { name, email } = selector {
            return Ok(vec![Recipient {
                user_id: None,
                name: name.clone(),
                email: email.clone(),
            }]);
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let base = users::table
            .filter(users::is_deleted.eq(false))
            .select(RecipientRow::as_select());

        let rows = match selector {
            RecipientSelector::Ids(ids) => {
                base.filter(users::id.eq_any(ids))
                    .load::<RecipientRow>(&mut conn)
                    .await
            }
            RecipientSelector::Role(role) => {
                base.filter(users::status.eq("active"))
                    .filter(users::role.eq(role.as_str()))
                    .load::<RecipientRow>(&mut conn)
                    .await
            }
            RecipientSelector::Broadcast => {
                base.filter(users::status.eq("active"))
                    .filter(users::role.ne(Role::Admin.as_str()))
                    .load::<RecipientRow>(&mut conn)
                    .await
            }
            RecipientSelector::External { .. } => return Ok(Vec::new()),
        }
        .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Recipient::from).collect())
    }
}
