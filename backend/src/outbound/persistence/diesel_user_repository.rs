//! PostgreSQL-backed [`UserRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserStoreError};
use crate::domain::user::{Email, PasswordHash, User, UserId, Username};

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
///
/// Username uniqueness is enforced by the database's unique index; a unique
/// violation on insert maps to [`UserStoreError::DuplicateUsername`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Rebuild a domain user from a database row.
///
/// Rows were validated on write; a row that no longer validates means the
/// database was modified out of band and surfaces as a query error.
fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    let username = Username::new(row.username)
        .map_err(|err| UserStoreError::query(format!("stored username is invalid: {err}")))?;
    let email = Email::new(row.email)
        .map_err(|err| UserStoreError::query(format!("stored email is invalid: {err}")))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        username,
        email,
        PasswordHash::from_encoded(row.password_hash),
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserStoreError::connection))?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password_hash().expose(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match err {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => UserStoreError::duplicate_username(user.username().as_ref()),
                other => map_diesel_error(other, UserStoreError::query, UserStoreError::connection),
            })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserStoreError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(*id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(err, UserStoreError::query, UserStoreError::connection)
            })?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserStoreError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(err, UserStoreError::query, UserStoreError::connection)
            })?;

        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Row mapping coverage; live-database behaviour is exercised against
    //! the same contracts by the in-memory adapter tests.
    use super::*;
    use uuid::Uuid;

    fn row(username: &str, email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
        }
    }

    #[test]
    fn valid_row_maps_to_user() {
        let user = row_to_user(row("alice", "alice@example.com")).expect("valid row maps");
        assert_eq!(user.username().as_ref(), "alice");
        assert_eq!(user.email().as_ref(), "alice@example.com");
    }

    #[test]
    fn corrupt_username_surfaces_as_query_error() {
        let err = row_to_user(row("has space", "alice@example.com"))
            .expect_err("corrupt row must fail");
        assert!(matches!(err, UserStoreError::Query { .. }));
    }
}
