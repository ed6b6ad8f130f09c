//! Argon2id password hashing adapter.
//!
//! Hashes are produced with a per-password random salt and stored in PHC
//! string format, so parameters can evolve without invalidating existing
//! credentials.

use argon2::password_hash::{rand_core::OsRng, PasswordVerifier, SaltString};
use argon2::Argon2;
use argon2::PasswordHasher as _;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::user::PasswordHash;

/// [`PasswordHasher`] adapter over argon2id with default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| PasswordHash::from_encoded(hash.to_string()))
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        argon2::password_hash::PasswordHash::new(hash.expose())
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}
