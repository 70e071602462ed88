//! Port abstraction for course persistence adapters.
use async_trait::async_trait;

use crate::domain::academy::Course;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by course repository adapters.
    pub enum CourseStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "course repository query failed: {message}",
        /// The referenced course does not exist.
        NotFound { id: i32 } => "course {id} not found",
    }
}

/// Insertable course record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Monthly fee in the smallest currency unit.
    pub monthly_fee_cents: i64,
}

/// Durable store for the course catalogue.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a course and return the stored record.
    async fn create(&self, course: NewCourse) -> Result<Course, CourseStoreError>;

    /// List all courses, newest first.
    async fn list(&self) -> Result<Vec<Course>, CourseStoreError>;

    /// Fetch one course by id.
    async fn find(&self, id: i32) -> Result<Option<Course>, CourseStoreError>;
}
