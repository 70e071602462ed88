//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use tracing::warn;

use crate::domain::events::{DomainEvent, NotificationRequest};
use crate::domain::ports::{
    BatchRepository, CourseRepository, DemoBookingRepository, EventRepository,
    ExamGradeRepository, InvoiceRepository, MaterialRepository, NotificationQueue,
    NotificationRepository, NoticeRepository, PushTokenRepository, UserRepository,
};
use crate::domain::user::RecipientSelector;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account store.
    pub users: Arc<dyn UserRepository>,
    /// Course catalogue store.
    pub courses: Arc<dyn CourseRepository>,
    /// Batch store.
    pub batches: Arc<dyn BatchRepository>,
    /// Invoice store.
    pub invoices: Arc<dyn InvoiceRepository>,
    /// Demo-booking store.
    pub demo_bookings: Arc<dyn DemoBookingRepository>,
    /// Notice store.
    pub notices: Arc<dyn NoticeRepository>,
    /// Academy event store.
    pub events: Arc<dyn EventRepository>,
    /// Exam grade store.
    pub exam_grades: Arc<dyn ExamGradeRepository>,
    /// Shared material store.
    pub materials: Arc<dyn MaterialRepository>,
    /// In-app notification store.
    pub notifications: Arc<dyn NotificationRepository>,
    /// Push token registrations.
    pub push_tokens: Arc<dyn PushTokenRepository>,
    /// Fire-and-forget hand-off into the fan-out pipeline.
    pub notifier: Arc<dyn NotificationQueue>,
}

impl HttpState {
    /// Enqueue a notification event after a successful primary write.
    ///
    /// Never fails the caller: the HTTP response is decided solely by the
    /// primary write, so a failed enqueue (worker gone during shutdown) is
    /// logged and swallowed.
    pub fn notify(&self, event: DomainEvent, recipients: RecipientSelector) {
        let request = NotificationRequest { event, recipients };
        if let Err(err) = self.notifier.enqueue(request) {
            warn!(error = %err, "notification enqueue failed; event dropped");
        }
    }
}
