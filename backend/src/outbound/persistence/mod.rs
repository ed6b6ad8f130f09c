//! PostgreSQL persistence adapters using Diesel.
//!
//! Thin adapters only: each repository translates between Diesel row models
//! and domain types, maps database errors to the port error enums, and holds
//! no business logic. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay internal to this module.

mod diesel_error;
mod diesel_feed_repository;
mod diesel_follow_graph;
mod diesel_message_store;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_feed_repository::DieselFeedRepository;
pub use diesel_follow_graph::DieselFollowGraph;
pub use diesel_message_store::DieselMessageStore;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
