//! Chirp backend library modules.
//!
//! The crate is organised hexagonally: `domain` holds entities, services,
//! and ports; `inbound` adapts HTTP requests onto the domain; `outbound`
//! implements the ports against infrastructure (PostgreSQL, in-memory
//! stores, the fan-out queue, argon2).

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-scoped tracing middleware and its task-local identifier.
pub use middleware::trace::{Trace, TraceId};
