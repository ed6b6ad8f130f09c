//! Port abstraction for the authoritative message log.

use async_trait::async_trait;

use crate::domain::message::Message;
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by message store adapters.
    pub enum MessageStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "message store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "message store query failed: {message}",
    }
}

/// Typed repository for posted messages.
///
/// The log is append-only; reads return newest first.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append an already-validated message to the log.
    async fn append(&self, message: &Message) -> Result<(), MessageStoreError>;

    /// Latest messages across all authors, newest first.
    async fn list_all(&self, limit: usize) -> Result<Vec<Message>, MessageStoreError>;

    /// Latest messages by one author, newest first.
    async fn list_by_author(
        &self,
        author: &UserId,
        limit: usize,
    ) -> Result<Vec<Message>, MessageStoreError>;
}
