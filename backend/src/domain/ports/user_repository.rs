//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::user::{Role, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another non-deleted account already uses this email.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

/// Insertable user record; the password arrives pre-hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// bcrypt hash of the chosen password.
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
}

/// Durable store for academy accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the stored record.
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError>;

    /// List active, non-deleted users.
    async fn list_active(&self) -> Result<Vec<User>, UserStoreError>;
}
