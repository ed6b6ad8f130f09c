//! Outbound adapters implementing the domain ports.

pub mod memory;
pub mod password;
pub mod persistence;
pub mod queue;
