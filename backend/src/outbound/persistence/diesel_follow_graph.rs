//! PostgreSQL-backed [`FollowGraph`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FollowGraph, FollowGraphError};
use crate::domain::user::UserId;

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::NewFollowRow;
use super::pool::DbPool;
use super::schema::follows;

/// Diesel-backed implementation of the [`FollowGraph`] port.
///
/// Edge uniqueness comes from the `(who, whom)` primary key: a unique
/// violation maps to [`FollowGraphError::DuplicateEdge`], and a delete that
/// touches no row maps to [`FollowGraphError::EdgeNotFound`].
#[derive(Clone)]
pub struct DieselFollowGraph {
    pool: DbPool,
}

impl DieselFollowGraph {
    /// Create a new adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_common(error: diesel::result::Error) -> FollowGraphError {
    map_diesel_error(error, FollowGraphError::query, FollowGraphError::connection)
}

#[async_trait]
impl FollowGraph for DieselFollowGraph {
    async fn insert(&self, who: &UserId, whom: &UserId) -> Result<(), FollowGraphError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FollowGraphError::connection))?;

        let row = NewFollowRow {
            who: *who.as_uuid(),
            whom: *whom.as_uuid(),
        };
        diesel::insert_into(follows::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match err {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => FollowGraphError::DuplicateEdge,
                other => map_common(other),
            })?;
        Ok(())
    }

    async fn remove(&self, who: &UserId, whom: &UserId) -> Result<(), FollowGraphError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FollowGraphError::connection))?;

        let deleted = diesel::delete(
            follows::table
                .filter(follows::who.eq(*who.as_uuid()))
                .filter(follows::whom.eq(*whom.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_common)?;

        if deleted == 0 {
            return Err(FollowGraphError::EdgeNotFound);
        }
        Ok(())
    }

    async fn is_following(&self, who: &UserId, whom: &UserId) -> Result<bool, FollowGraphError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FollowGraphError::connection))?;

        diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::who.eq(*who.as_uuid()))
                .filter(follows::whom.eq(*whom.as_uuid())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_common)
    }

    async fn followers_of(&self, user: &UserId) -> Result<Vec<UserId>, FollowGraphError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FollowGraphError::connection))?;

        let followers: Vec<Uuid> = follows::table
            .filter(follows::whom.eq(*user.as_uuid()))
            .order(follows::who.asc())
            .select(follows::who)
            .load(&mut conn)
            .await
            .map_err(map_common)?;

        Ok(followers.into_iter().map(UserId::from_uuid).collect())
    }
}
