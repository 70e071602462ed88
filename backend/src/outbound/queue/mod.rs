//! Channel-backed adapter for the `NotificationQueue` port.
//!
//! Fire-and-forget dispatch is made explicit: handlers push onto an
//! unbounded in-process channel and a single background worker task owns
//! the receiving end for the process lifetime. The HTTP response therefore
//! never waits on delivery, and the hand-off point is where a dead-letter
//! queue or drop-rate metrics would attach later.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::events::NotificationRequest;
use crate::domain::fanout::NotificationFanout;
use crate::domain::ports::{DispatchError, NotificationQueue};

/// Sending half of the notification pipeline.
#[derive(Clone)]
pub struct ChannelNotificationQueue {
    sender: mpsc::UnboundedSender<NotificationRequest>,
}

impl NotificationQueue for ChannelNotificationQueue {
    fn enqueue(&self, request: NotificationRequest) -> Result<(), DispatchError> {
        self.sender
            .send(request)
            .map_err(|err| DispatchError::closed(err.to_string()))
    }
}

/// Create the queue and its receiving end.
pub fn notification_channel() -> (
    ChannelNotificationQueue,
    mpsc::UnboundedReceiver<NotificationRequest>,
) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelNotificationQueue { sender }, receiver)
}

/// Spawn the worker that drains the queue into the fan-out.
///
/// The task runs until every sender is dropped; requests are processed one
/// at a time, while recipients within a request still fan out concurrently.
pub fn spawn_fanout_worker(
    mut receiver: mpsc::UnboundedReceiver<NotificationRequest>,
    fanout: Arc<NotificationFanout>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("notification fan-out worker started");
        while let Some(request) = receiver.recv().await {
            let report = fanout.deliver(request).await;
            debug!(
                recipients = report.recipients,
                emails = report.emails_sent,
                stored = report.notifications_stored,
                pushes = report.pushes_attempted,
                "notification request processed"
            );
        }
        info!("notification queue closed; fan-out worker stopping");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::DomainEvent;
    use crate::domain::user::RecipientSelector;

    fn request() -> NotificationRequest {
        NotificationRequest {
            event: DomainEvent::Notice {
                title: "Holiday".to_owned(),
                body: "Closed Friday".to_owned(),
            },
            recipients: RecipientSelector::Broadcast,
        }
    }

    #[tokio::test]
    async fn enqueue_hands_requests_to_the_receiver() {
        let (queue, mut receiver) = notification_channel();
        queue.enqueue(request()).expect("enqueue succeeds");
        let received = receiver.recv().await.expect("request delivered");
        assert_eq!(received, request());
    }

    #[tokio::test]
    async fn enqueue_reports_closure_once_the_receiver_is_gone() {
        let (queue, receiver) = notification_channel();
        drop(receiver);
        let result = queue.enqueue(request());
        assert!(matches!(result, Err(DispatchError::Closed { .. })));
    }
}
