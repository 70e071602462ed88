//! Port managing registered FCM device tokens.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by push token repository adapters.
    pub enum PushTokenStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "push token store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "push token store query failed: {message}",
    }
}

/// Durable store for `(user, device token)` registrations.
///
/// Tokens are soft-deactivated (`is_active = false`) rather than deleted so
/// that delivery history stays attributable.
#[async_trait]
pub trait PushTokenRepository: Send + Sync {
    /// Active token strings registered for a user.
    async fn active_tokens(&self, user_id: i32) -> Result<Vec<String>, PushTokenStoreError>;

    /// Register a token, reactivating it when `(user_id, token)` already
    /// exists.
    async fn upsert(
        &self,
        user_id: i32,
        token: &str,
        device_type: &str,
    ) -> Result<(), PushTokenStoreError>;

    /// Soft-deactivate a token; returns false when no row matched.
    async fn deactivate(&self, user_id: i32, token: &str) -> Result<bool, PushTokenStoreError>;
}
