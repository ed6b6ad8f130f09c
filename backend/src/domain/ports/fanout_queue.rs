//! Port describing queue dispatch semantics for fan-out deliveries.

use async_trait::async_trait;

use crate::domain::feed::FeedEntry;
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the fan-out queue adapter.
    pub enum DeliveryDispatchError {
        /// The queue no longer accepts deliveries (shutdown in progress).
        Closed { message: String } => "fan-out queue is closed: {message}",
    }
}

/// One fan-out unit of work: deliver one feed entry to one recipient.
///
/// Deliveries are independent and retryable; a failure delivering to one
/// recipient never blocks another recipient's delivery. At-least-once
/// dispatch is safe because feed appends deduplicate by message id.
#[derive(Debug, Clone, PartialEq)]
pub struct FanoutDelivery {
    /// The follower whose feed receives the entry.
    pub recipient: UserId,
    /// The entry to append.
    pub entry: FeedEntry,
}

/// Dispatch port for fan-out deliveries.
#[async_trait]
pub trait FanoutQueue: Send + Sync {
    /// Enqueue a delivery for asynchronous processing.
    async fn enqueue(&self, delivery: FanoutDelivery) -> Result<(), DeliveryDispatchError>;
}
