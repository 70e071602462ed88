//! PostgreSQL-backed `CourseRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::academy::Course;
use crate::domain::ports::{CourseRepository, CourseStoreError, NewCourse};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::models::{CourseRow, NewCourseRow};
use super::pool::{DbPool, PoolError};
use super::schema::courses;

/// Diesel-backed implementation of the `CourseRepository` port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CourseStoreError {
    CourseStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> CourseStoreError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => CourseStoreError::connection(error.to_string()),
        DbFailure::Query | DbFailure::UniqueViolation => CourseStoreError::query(error.to_string()),
    }
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn create(&self, course: NewCourse) -> Result<Course, CourseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCourseRow {
            name: &course.name,
            description: &course.description,
            monthly_fee_cents: course.monthly_fee_cents,
        };
        let stored: CourseRow = diesel::insert_into(courses::table)
            .values(&row)
            .returning(CourseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn list(&self) -> Result<Vec<Course>, CourseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = courses::table
            .order(courses::created_at.desc())
            .select(CourseRow::as_select())
            .load::<CourseRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Course>, CourseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = courses::table
            .find(id)
            .select(CourseRow::as_select())
            .first::<CourseRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Course::from))
    }
}
