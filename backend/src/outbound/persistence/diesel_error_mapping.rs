//! Shared Diesel/pool error classification for persistence adapters.
//!
//! Adapters map infrastructure failures into their port error enums via the
//! two closures returned by callers; this module centralises the
//! classification so log context stays uniform.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Infrastructure failure classes shared by every persistence port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbFailure {
    /// The connection could not be obtained or was lost.
    Connection,
    /// The statement failed during execution.
    Query,
    /// A unique constraint rejected the write.
    UniqueViolation,
}

/// Classify a pool checkout failure.
pub fn classify_pool_error(error: &PoolError) -> DbFailure {
    match error {
        PoolError::Checkout { .. } | PoolError::Build { .. } => DbFailure::Connection,
    }
}

/// Classify a Diesel execution failure, logging the detail at debug level.
pub fn classify_diesel_error(error: &DieselError) -> DbFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::UniqueViolation => DbFailure::UniqueViolation,
                DatabaseErrorKind::ClosedConnection => DbFailure::Connection,
                _ => DbFailure::Query,
            }
        }
        other => {
            debug!(
                error_type = %std::any::type_name_of_val(other),
                "diesel operation failed"
            );
            DbFailure::Query
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_classify_as_connection() {
        assert_eq!(
            classify_pool_error(&PoolError::checkout("timed out")),
            DbFailure::Connection
        );
        assert_eq!(
            classify_pool_error(&PoolError::build("bad url")),
            DbFailure::Connection
        );
    }

    #[test]
    fn not_found_classifies_as_query() {
        assert_eq!(classify_diesel_error(&DieselError::NotFound), DbFailure::Query);
    }
}
