//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Each entity gets an explicit typed repository trait; adapters live in
//! [`crate::outbound`]. Port errors are adapter-level and transport-free;
//! services translate them into the [`crate::domain::Error`] taxonomy.

mod macros;
pub(crate) use macros::define_port_error;

mod fanout_queue;
mod feed_repository;
mod follow_graph;
mod message_store;
mod password_hasher;
mod user_repository;

pub use fanout_queue::{DeliveryDispatchError, FanoutDelivery, FanoutQueue};
pub use feed_repository::{FeedRepository, FeedStoreError};
pub use follow_graph::{FollowGraph, FollowGraphError};
pub use message_store::{MessageStore, MessageStoreError};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use user_repository::{UserRepository, UserStoreError};
