//! Notification fan-out: one logical event delivered over email, in-app
//! rows, and mobile push.
//!
//! Delivery is strictly best effort. Channels are isolated per recipient so
//! one channel's failure never blocks another; the only ordering guarantee
//! is that push is attempted only after the in-app row is durably written,
//! so a push notification never exists without its in-app record.
//!
//! No deduplication is performed: a handler invoked twice for the same
//! logical event (e.g. a retried HTTP request) produces duplicate sends.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::domain::events::{NotificationRequest, RenderedMessage};
use crate::domain::ports::{
    Mailer, NewInAppNotification, NotificationRepository, OutgoingEmail, PushDeliveryError,
    PushGateway, PushMessage, PushTokenRepository, RecipientDirectory,
};
use crate::domain::user::Recipient;

/// Delivery statistics for one fan-out invocation, used by logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Recipients the event was rendered for.
    pub recipients: usize,
    /// Emails handed to the mail transport (or logged in degraded mode).
    pub emails_sent: usize,
    /// In-app rows written.
    pub notifications_stored: usize,
    /// Multicast pushes attempted (at most one per recipient).
    pub pushes_attempted: usize,
}

/// Fans one event out to all resolved recipients over all channels.
pub struct NotificationFanout {
    directory: Arc<dyn RecipientDirectory>,
    notifications: Arc<dyn NotificationRepository>,
    push_tokens: Arc<dyn PushTokenRepository>,
    mailer: Arc<dyn Mailer>,
    push: Option<Arc<dyn PushGateway>>,
}

impl NotificationFanout {
    /// Assemble the fan-out from its collaborating ports.
    ///
    /// `push` is `None` when no push credentials are configured; the push
    /// channel then degrades to a logged no-op for the process lifetime.
    pub fn new(
        directory: Arc<dyn RecipientDirectory>,
        notifications: Arc<dyn NotificationRepository>,
        push_tokens: Arc<dyn PushTokenRepository>,
        mailer: Arc<dyn Mailer>,
        push: Option<Arc<dyn PushGateway>>,
    ) -> Self {
        Self {
            directory,
            notifications,
            push_tokens,
            mailer,
            push,
        }
    }

    /// Deliver one request to every resolved recipient.
    ///
    /// Recipients are processed concurrently with no defined relative
    /// order. Resolution failure ends the fan-out for this event; failures
    /// past that point are logged per recipient and channel.
    pub async fn deliver(&self, request: NotificationRequest) -> DeliveryReport {
        let recipients = match self.directory.resolve(&request.recipients).await {
            Ok(recipients) => recipients,
            Err(err) => {
                warn!(error = %err, event = ?request.event, "recipient resolution failed; dropping event");
                return DeliveryReport::default();
            }
        };
        if recipients.is_empty() {
            debug!(event = ?request.event, "no recipients resolved; nothing to deliver");
            return DeliveryReport::default();
        }

        let per_recipient = join_all(
            recipients
                .iter()
                .map(|recipient| self.deliver_to(recipient, &request)),
        )
        .await;

        let mut report = DeliveryReport {
            recipients: recipients.len(),
            ..DeliveryReport::default()
        };
        for outcome in per_recipient {
            report.emails_sent += usize::from(outcome.email_sent);
            report.notifications_stored += usize::from(outcome.notification_stored);
            report.pushes_attempted += usize::from(outcome.push_attempted);
        }
        report
    }

    async fn deliver_to(
        &self,
        recipient: &Recipient,
        request: &NotificationRequest,
    ) -> RecipientOutcome {
        let message = request.event.render(recipient);
        let (email_sent, (notification_stored, push_attempted)) = tokio::join!(
            self.send_email(recipient, &message),
            self.record_then_push(recipient, &message),
        );
        RecipientOutcome {
            email_sent,
            notification_stored,
            push_attempted,
        }
    }

    async fn send_email(&self, recipient: &Recipient, message: &RenderedMessage) -> bool {
        let email = OutgoingEmail {
            to_name: recipient.name.clone(),
            to_email: recipient.email.clone(),
            subject: message.subject.clone(),
            body_text: message.body.clone(),
        };
        match self.mailer.send(&email).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    error = %err,
                    recipient = %recipient.email,
                    subject = %message.subject,
                    "email delivery failed"
                );
                false
            }
        }
    }

    /// Write the in-app row, then (and only then) attempt push.
    ///
    /// Recipients without an account have nowhere to store the row, so both
    /// steps are skipped; email remains their only channel.
    async fn record_then_push(
        &self,
        recipient: &Recipient,
        message: &RenderedMessage,
    ) -> (bool, bool) {
        let Some(user_id) = recipient.user_id else {
            return (false, false);
        };
        let row = NewInAppNotification {
            user_id,
            title: message.push_title.clone(),
            message: message.push_body.clone(),
            kind: message.kind,
        };
        match self.notifications.insert(row).await {
            Ok(_) => {
                let pushed = self.push_to(user_id, message).await;
                (true, pushed)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    recipient_id = user_id,
                    title = %message.push_title,
                    "in-app notification insert failed; push skipped"
                );
                (false, false)
            }
        }
    }

    async fn push_to(&self, user_id: i32, message: &RenderedMessage) -> bool {
        let Some(gateway) = &self.push else {
            debug!(recipient_id = user_id, "push disabled; skipping");
            return false;
        };

        let tokens = match self.push_tokens.active_tokens(user_id).await {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, recipient_id = user_id, "push token lookup failed");
                return false;
            }
        };
        if tokens.is_empty() {
            return false;
        }

        let payload = PushMessage {
            title: message.push_title.clone(),
            body: message.push_body.clone(),
        };
        let outcome = match gateway.send_multicast(&tokens, &payload).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    error = %err,
                    recipient_id = user_id,
                    title = %message.push_title,
                    "push multicast failed"
                );
                return true;
            }
        };
        debug!(
            recipient_id = user_id,
            success = outcome.success_count(),
            failure = outcome.failure_count(),
            "push multicast completed"
        );

        for (token, delivery) in tokens.iter().zip(&outcome.deliveries) {
            let invalid = delivery
                .error
                .as_ref()
                .is_some_and(PushDeliveryError::invalidates_token);
            if invalid {
                // Best effort: a failed deactivation only means one extra
                // doomed send on the next event.
                if let Err(err) = self.push_tokens.deactivate(user_id, token).await {
                    warn!(error = %err, recipient_id = user_id, "token deactivation failed");
                }
            }
        }
        true
    }
}

struct RecipientOutcome {
    email_sent: bool,
    notification_stored: bool,
    push_attempted: bool,
}
