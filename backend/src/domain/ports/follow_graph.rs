//! Port abstraction for the directed follow relation.

use async_trait::async_trait;

use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by follow graph adapters.
    pub enum FollowGraphError {
        /// The exact `(who, whom)` edge already exists.
        DuplicateEdge => "follow edge already exists",
        /// No `(who, whom)` edge to remove.
        EdgeNotFound => "follow edge does not exist",
        /// Store connection could not be established.
        Connection { message: String } => "follow graph connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow graph query failed: {message}",
    }
}

/// Typed repository for `who → whom` follow edges, queryable in both
/// directions.
///
/// Adapters enforce edge uniqueness ([`FollowGraphError::DuplicateEdge`])
/// and exact-match removal ([`FollowGraphError::EdgeNotFound`]); the service
/// layer decides how those surface to clients. Self-follow is rejected
/// before the port is reached and adapters may assume `who != whom`.
#[async_trait]
pub trait FollowGraph: Send + Sync {
    /// Insert the `(who, whom)` edge.
    async fn insert(&self, who: &UserId, whom: &UserId) -> Result<(), FollowGraphError>;

    /// Remove the exact `(who, whom)` edge.
    async fn remove(&self, who: &UserId, whom: &UserId) -> Result<(), FollowGraphError>;

    /// Whether `who` currently follows `whom`.
    async fn is_following(&self, who: &UserId, whom: &UserId) -> Result<bool, FollowGraphError>;

    /// All users following `user`.
    async fn followers_of(&self, user: &UserId) -> Result<Vec<UserId>, FollowGraphError>;
}
