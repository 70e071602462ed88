//! Port abstraction for demo-booking persistence adapters.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::academy::{DemoBooking, DemoStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by demo-booking repository adapters.
    pub enum DemoBookingStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "demo booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "demo booking repository query failed: {message}",
        /// The referenced booking does not exist.
        NotFound { id: i32 } => "demo booking {id} not found",
    }
}

/// Insertable demo-booking record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDemoBooking {
    /// Prospect name.
    pub name: String,
    /// Prospect email.
    pub email: String,
    /// Course the demo is booked for.
    pub course_id: i32,
}

/// An applied status update together with the pre-update status.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoBookingChange {
    /// Status before the update.
    pub previous_status: DemoStatus,
    /// The booking after the update.
    pub booking: DemoBooking,
}

/// Durable store for demo bookings.
#[async_trait]
pub trait DemoBookingRepository: Send + Sync {
    /// Insert a booking in the `requested` state.
    async fn create(&self, booking: NewDemoBooking) -> Result<DemoBooking, DemoBookingStoreError>;

    /// Update status (and optionally the slot) and report the previous
    /// status.
    async fn update_status(
        &self,
        id: i32,
        status: DemoStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<DemoBookingChange, DemoBookingStoreError>;

    /// List all bookings, newest first.
    async fn list(&self) -> Result<Vec<DemoBooking>, DemoBookingStoreError>;
}
