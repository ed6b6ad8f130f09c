//! Port abstraction for per-user denormalized feed caches.

use async_trait::async_trait;

use crate::domain::feed::{FeedAppend, FeedEntry};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by feed store adapters.
    pub enum FeedStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "feed store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "feed store query failed: {message}",
    }
}

/// Typed repository for per-user feed caches.
///
/// Adapters must implement the append contract from
/// [`crate::domain::feed::insert_bounded`]: idempotent by message id,
/// ordered by `(posted_at, message_id)`, trimmed to the retention cap on
/// write. Appends for different recipients must not contend on a shared
/// lock; only a single recipient's feed is serialized.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Append one entry to `recipient`'s feed.
    async fn append(
        &self,
        recipient: &UserId,
        entry: FeedEntry,
    ) -> Result<FeedAppend, FeedStoreError>;

    /// The most recent entries of `recipient`'s feed, newest first.
    async fn entries(
        &self,
        recipient: &UserId,
        limit: usize,
    ) -> Result<Vec<FeedEntry>, FeedStoreError>;
}
