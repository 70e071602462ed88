//! Port for the transactional email channel.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transport adapters.
    pub enum MailDeliveryError {
        /// The recipient address could not be parsed.
        InvalidRecipient { message: String } => "invalid email recipient: {message}",
        /// The message could not be composed.
        Compose { message: String } => "failed to compose email: {message}",
        /// The SMTP transport rejected or failed to deliver the message.
        Transport { message: String } => "mail transport failed: {message}",
    }
}

/// One outgoing transactional email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient display name.
    pub to_name: String,
    /// Recipient address.
    pub to_email: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body; adapters own HTML framing.
    pub body_text: String,
}

/// Sends transactional email.
///
/// When no SMTP transport is configured the process substitutes a logging
/// implementation whose `send` records the message and succeeds, so callers
/// never branch on mail availability.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email; best effort, no retry.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailDeliveryError>;
}
