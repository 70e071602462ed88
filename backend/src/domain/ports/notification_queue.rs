//! Port describing fire-and-forget dispatch into the fan-out pipeline.
use crate::domain::events::NotificationRequest;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the queue adapter.
    pub enum DispatchError {
        /// The consuming worker has stopped; the request was dropped.
        Closed { message: String } => "notification queue is closed: {message}",
    }
}

/// One-way, non-blocking hand-off of notification requests.
///
/// `enqueue` is deliberately synchronous: handlers call it after the primary
/// write and never wait on delivery. A failed enqueue is logged by the
/// caller and otherwise swallowed — the HTTP response has already been
/// decided by the primary write.
pub trait NotificationQueue: Send + Sync {
    /// Hand a request to the background worker.
    fn enqueue(&self, request: NotificationRequest) -> Result<(), DispatchError>;
}
