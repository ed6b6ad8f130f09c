//! Port abstraction for salted one-way password hashing.

use crate::domain::user::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing credentials.
    pub enum PasswordHashError {
        /// The hashing primitive rejected the input.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Salted one-way password hashing behind a seam so tests can substitute a
/// cheap deterministic implementation.
///
/// `verify` is infallible by design: a malformed stored hash means the
/// credential cannot match, which is indistinguishable from a wrong
/// password to the caller.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into an encoded PHC string.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Verify a plaintext password against a stored hash.
    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool;
}
