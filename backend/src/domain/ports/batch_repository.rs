//! Port abstraction for batch persistence adapters.
use async_trait::async_trait;

use crate::domain::academy::Batch;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by batch repository adapters.
    pub enum BatchStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "batch repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "batch repository query failed: {message}",
        /// The referenced batch does not exist.
        NotFound { id: i32 } => "batch {id} not found",
    }
}

/// Insertable batch record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBatch {
    /// Display name.
    pub name: String,
    /// Owning course.
    pub course_id: i32,
    /// Human-readable schedule line.
    pub schedule: String,
    /// Ids of enrolled students.
    pub student_ids: Vec<i32>,
}

/// Mutable batch fields; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New schedule line.
    pub schedule: Option<String>,
    /// Replacement student list.
    pub student_ids: Option<Vec<i32>>,
}

/// An applied batch update together with the pre-update student list,
/// so callers can notify only newly added students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchChange {
    /// Student ids before the update.
    pub previous_student_ids: Vec<i32>,
    /// The batch after the update.
    pub batch: Batch,
}

/// Durable store for batches.
#[async_trait]
pub trait BatchRepository: Send + Sync {
    /// Insert a batch and return the stored record.
    async fn create(&self, batch: NewBatch) -> Result<Batch, BatchStoreError>;

    /// Apply an update and report the previous student list.
    async fn update(&self, id: i32, update: BatchUpdate) -> Result<BatchChange, BatchStoreError>;

    /// List all batches.
    async fn list(&self) -> Result<Vec<Batch>, BatchStoreError>;
}
