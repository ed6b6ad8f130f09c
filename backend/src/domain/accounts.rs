//! Account registration and authentication service.

use std::sync::Arc;

use tracing::info;

use super::auth::{LoginCredentials, RegistrationRequest};
use super::error::Error;
use super::ports::{PasswordHasher, UserRepository, UserStoreError};
use super::user::{User, UserId, Username};

/// Map user store failures to the domain taxonomy.
fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::DuplicateUsername { username } => {
            Error::conflict(format!("username already taken: {username}"))
        }
        UserStoreError::Connection { message } => Error::service_unavailable(message),
        UserStoreError::Query { message } => Error::internal(message),
    }
}

/// Registration and login use-cases over the user store and password hasher.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Create a service over the given ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Register a new account.
    ///
    /// Field validation already happened in
    /// [`RegistrationRequest::try_from_parts`]; the remaining check is
    /// username uniqueness, which runs last so earlier validation failures
    /// win. The store's own uniqueness guarantee covers the race between the
    /// lookup and the insert.
    pub async fn register(&self, request: RegistrationRequest) -> Result<User, Error> {
        let (username, email, password) = request.into_parts();

        let existing = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_store_error)?;
        if existing.is_some() {
            return Err(Error::conflict(format!(
                "username already taken: {username}"
            )));
        }

        let password_hash = self
            .hasher
            .hash(password.as_str())
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = User::new(UserId::random(), username, email, password_hash);

        self.users
            .insert(&user)
            .await
            .map_err(map_user_store_error)?;
        info!(user_id = %user.id(), username = %user.username(), "registered new user");
        Ok(user)
    }

    /// Authenticate login credentials.
    ///
    /// An unknown username fails with `NotFound`; a wrong password fails
    /// with `Unauthorized`. A login name that does not even parse as a
    /// [`Username`] cannot exist in the store and is treated as unknown.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(Error::not_found("unknown username"));
        };
        let user = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("unknown username"))?;

        if !self
            .hasher
            .verify(credentials.password(), user.password_hash())
        {
            return Err(Error::unauthorized("invalid password"));
        }
        Ok(user)
    }

    /// Load the account behind a session's user id, if it still exists.
    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_store_error)
    }
}
