//! Port for the mobile push channel.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors that fail an entire multicast send.
    pub enum PushSendError {
        /// Provider credentials could not be exchanged for an access token.
        Auth { message: String } => "push provider authentication failed: {message}",
        /// The provider could not be reached.
        Transport { message: String } => "push transport failed: {message}",
    }
}

/// Notification payload common to all device platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
}

/// Why one token in a multicast failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushDeliveryError {
    /// The token is no longer registered with the provider.
    Unregistered,
    /// The token is malformed or rejected as invalid.
    InvalidToken,
    /// Any other provider-side failure.
    Provider {
        /// Provider-supplied status or message.
        message: String,
    },
}

impl PushDeliveryError {
    /// Whether the owning token should be soft-deactivated.
    pub fn invalidates_token(&self) -> bool {
        matches!(self, Self::Unregistered | Self::InvalidToken)
    }
}

/// Per-token result within one multicast send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDelivery {
    /// Whether the provider accepted the message for this token.
    pub success: bool,
    /// Failure detail when `success` is false.
    pub error: Option<PushDeliveryError>,
}

/// Result of one multicast send, index-aligned with the input tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticastOutcome {
    /// One entry per input token, in input order.
    pub deliveries: Vec<TokenDelivery>,
}

impl MulticastOutcome {
    /// Number of tokens the provider accepted.
    pub fn success_count(&self) -> usize {
        self.deliveries.iter().filter(|d| d.success).count()
    }

    /// Number of tokens the provider rejected.
    pub fn failure_count(&self) -> usize {
        self.deliveries.len() - self.success_count()
    }
}

/// Sends one message to many device tokens in a single logical call.
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Multicast `message` to `tokens`; per-token outcomes are reported in
    /// input order.
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<MulticastOutcome, PushSendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_counts_split_by_success() {
        let outcome = MulticastOutcome {
            deliveries: vec![
                TokenDelivery {
                    success: true,
                    error: None,
                },
                TokenDelivery {
                    success: false,
                    error: Some(PushDeliveryError::Unregistered),
                },
            ],
        };
        assert_eq!(outcome.success_count(), 1);
        assert_eq!(outcome.failure_count(), 1);
    }

    #[test]
    fn only_token_level_errors_invalidate() {
        assert!(PushDeliveryError::Unregistered.invalidates_token());
        assert!(PushDeliveryError::InvalidToken.invalidates_token());
        assert!(
            !PushDeliveryError::Provider {
                message: "internal".to_owned()
            }
            .invalidates_token()
        );
    }
}
