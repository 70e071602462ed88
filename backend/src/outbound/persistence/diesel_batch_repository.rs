//! PostgreSQL-backed `BatchRepository` adapter.
//!
//! Updates return the pre-update student list so callers can diff it
//! against the new one and notify only newly added students.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::academy::Batch;
use crate::domain::ports::{
    BatchChange, BatchRepository, BatchStoreError, BatchUpdate, NewBatch,
};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::models::{BatchChangesRow, BatchRow, NewBatchRow};
use super::pool::{DbPool, PoolError};
use super::schema::batches;

/// Diesel-backed implementation of the `BatchRepository` port.
#[derive(Clone)]
pub struct DieselBatchRepository {
    pool: DbPool,
}

impl DieselBatchRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BatchStoreError {
    BatchStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> BatchStoreError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => BatchStoreError::connection(error.to_string()),
        DbFailure::Query | DbFailure::UniqueViolation => BatchStoreError::query(error.to_string()),
    }
}

#[async_trait]
impl BatchRepository for DieselBatchRepository {
    async fn create(&self, batch: NewBatch) -> Result<Batch, BatchStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBatchRow {
            name: &batch.name,
            course_id: batch.course_id,
            student_ids: &batch.student_ids,
            schedule: &batch.schedule,
        };
        let stored: BatchRow = diesel::insert_into(batches::table)
            .values(&row)
            .returning(BatchRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn update(&self, id: i32, update: BatchUpdate) -> Result<BatchChange, BatchStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let previous: BatchRow = batches::table
            .find(id)
            .select(BatchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or(BatchStoreError::NotFound { id })?;

        let changes = BatchChangesRow {
            name: update.name,
            schedule: update.schedule,
            student_ids: update.student_ids,
        };
        let stored: BatchRow = diesel::update(batches::table.find(id))
            .set((changes, batches::updated_at.eq(diesel::dsl::now)))
            .returning(BatchRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(BatchChange {
            previous_student_ids: previous.student_ids,
            batch: stored.into(),
        })
    }

    async fn list(&self) -> Result<Vec<Batch>, BatchStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = batches::table
            .order(batches::created_at.desc())
            .select(BatchRow::as_select())
            .load::<BatchRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Batch::from).collect())
    }
}
