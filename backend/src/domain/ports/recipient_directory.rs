//! Port resolving recipient selectors to concrete recipients.
use async_trait::async_trait;

use crate::domain::user::{Recipient, RecipientSelector};

use super::define_port_error;

define_port_error! {
    /// Errors raised while resolving recipients.
    pub enum RecipientLookupError {
        /// Directory connection could not be established.
        Connection { message: String } => "recipient directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "recipient lookup failed: {message}",
    }
}

/// Resolves a [`RecipientSelector`] into a read-only recipient snapshot.
///
/// Explicit id lists exclude deleted accounts; role and broadcast selectors
/// additionally require `status = 'active'`, and broadcast excludes admins.
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// Resolve the selector into zero or more recipients.
    async fn resolve(
        &self,
        selector: &RecipientSelector,
    ) -> Result<Vec<Recipient>, RecipientLookupError>;
}
