//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::user::{User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user store adapters.
    pub enum UserStoreError {
        /// Another user already holds this username.
        DuplicateUsername { username: String } => "username already taken: {username}",
        /// Store connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
    }
}

/// Typed repository for user accounts.
///
/// The username uniqueness invariant is enforced here: `insert` fails with
/// [`UserStoreError::DuplicateUsername`] rather than silently overwriting.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserStoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by unique username.
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<User>, UserStoreError>;
}
