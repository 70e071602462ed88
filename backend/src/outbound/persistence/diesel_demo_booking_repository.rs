//! PostgreSQL-backed `DemoBookingRepository` adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::academy::{DemoBooking, DemoStatus};
use crate::domain::ports::{
    DemoBookingChange, DemoBookingRepository, DemoBookingStoreError, NewDemoBooking,
};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::models::{DemoBookingRow, NewDemoBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::demo_bookings;

/// Diesel-backed implementation of the `DemoBookingRepository` port.
#[derive(Clone)]
pub struct DieselDemoBookingRepository {
    pool: DbPool,
}

impl DieselDemoBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DemoBookingStoreError {
    DemoBookingStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> DemoBookingStoreError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => DemoBookingStoreError::connection(error.to_string()),
        DbFailure::Query | DbFailure::UniqueViolation => {
            DemoBookingStoreError::query(error.to_string())
        }
    }
}

#[async_trait]
impl DemoBookingRepository for DieselDemoBookingRepository {
    async fn create(&self, booking: NewDemoBooking) -> Result<DemoBooking, DemoBookingStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewDemoBookingRow {
            name: &booking.name,
            email: &booking.email,
            course_id: booking.course_id,
            status: DemoStatus::Requested.as_str(),
        };
        let stored: DemoBookingRow = diesel::insert_into(demo_bookings::table)
            .values(&row)
            .returning(DemoBookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn update_status(
        &self,
        id: i32,
        status: DemoStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<DemoBookingChange, DemoBookingStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let previous: DemoBookingRow = demo_bookings::table
            .find(id)
            .select(DemoBookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or(DemoBookingStoreError::NotFound { id })?;

        let stored: DemoBookingRow = match scheduled_at {
            Some(slot) => {
                diesel::update(demo_bookings::table.find(id))
                    .set((
                        demo_bookings::status.eq(status.as_str()),
                        demo_bookings::scheduled_at.eq(Some(slot)),
                        demo_bookings::updated_at.eq(diesel::dsl::now),
                    ))
                    .returning(DemoBookingRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
            None => {
                diesel::update(demo_bookings::table.find(id))
                    .set((
                        demo_bookings::status.eq(status.as_str()),
                        demo_bookings::updated_at.eq(diesel::dsl::now),
                    ))
                    .returning(DemoBookingRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(DemoBookingChange {
            previous_status: DemoStatus::from_db(&previous.status),
            booking: stored.into(),
        })
    }

    async fn list(&self) -> Result<Vec<DemoBooking>, DemoBookingStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = demo_bookings::table
            .order(demo_bookings::created_at.desc())
            .select(DemoBookingRow::as_select())
            .load::<DemoBookingRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(DemoBooking::from).collect())
    }
}
