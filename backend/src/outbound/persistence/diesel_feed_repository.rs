//! PostgreSQL-backed [`FeedRepository`] implementation using Diesel.
//!
//! The `(user_id, message_id)` primary key makes appends idempotent
//! (`ON CONFLICT DO NOTHING`), and each append runs in a transaction that
//! also trims the recipient's feed to the retention cap. Transactions touch
//! a single recipient's rows, so concurrent workers targeting different
//! followers never contend.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::feed::{FeedAppend, FeedEntry, FEED_RETENTION};
use crate::domain::message::{MessageId, MessageText};
use crate::domain::ports::{FeedRepository, FeedStoreError};
use crate::domain::user::{AuthorProfile, Email, UserId, Username};

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::{FeedEntryRow, NewFeedEntryRow};
use super::pool::DbPool;
use super::schema::feed_entries;

/// Diesel-backed implementation of the [`FeedRepository`] port.
#[derive(Clone)]
pub struct DieselFeedRepository {
    pool: DbPool,
}

impl DieselFeedRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_common(error: diesel::result::Error) -> FeedStoreError {
    map_diesel_error(error, FeedStoreError::query, FeedStoreError::connection)
}

fn retention_cap() -> i64 {
    i64::try_from(FEED_RETENTION).unwrap_or(i64::MAX)
}

/// Rebuild a domain feed entry from a database row.
fn row_to_entry(row: FeedEntryRow) -> Result<FeedEntry, FeedStoreError> {
    let username = Username::new(row.author_username)
        .map_err(|err| FeedStoreError::query(format!("stored username is invalid: {err}")))?;
    let email = Email::new(row.author_email)
        .map_err(|err| FeedStoreError::query(format!("stored email is invalid: {err}")))?;
    let text = MessageText::new(row.body)
        .map_err(|err| FeedStoreError::query(format!("stored body is invalid: {err}")))?;
    Ok(FeedEntry {
        message_id: MessageId::from_uuid(row.message_id),
        author: AuthorProfile {
            id: UserId::from_uuid(row.author_id),
            username,
            email,
        },
        text,
        posted_at: row.posted_at,
    })
}

#[async_trait]
impl FeedRepository for DieselFeedRepository {
    async fn append(
        &self,
        recipient: &UserId,
        entry: FeedEntry,
    ) -> Result<FeedAppend, FeedStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FeedStoreError::connection))?;

        let owner = *recipient.as_uuid();
        let row = NewFeedEntryRow {
            user_id: owner,
            message_id: *entry.message_id.as_uuid(),
            author_id: *entry.author.id.as_uuid(),
            author_username: entry.author.username.to_string(),
            author_email: entry.author.email.to_string(),
            body: entry.text.to_string(),
            posted_at: entry.posted_at,
        };

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(feed_entries::table)
                    .values(&row)
                    .on_conflict((feed_entries::user_id, feed_entries::message_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;
                if inserted == 0 {
                    return Ok(FeedAppend::Duplicate);
                }

                let count: i64 = feed_entries::table
                    .filter(feed_entries::user_id.eq(owner))
                    .count()
                    .get_result(conn)
                    .await?;
                if count > retention_cap() {
                    let stale: Vec<Uuid> = feed_entries::table
                        .filter(feed_entries::user_id.eq(owner))
                        .order((
                            feed_entries::posted_at.asc(),
                            feed_entries::message_id.asc(),
                        ))
                        .limit(count - retention_cap())
                        .select(feed_entries::message_id)
                        .load(conn)
                        .await?;
                    diesel::delete(
                        feed_entries::table
                            .filter(feed_entries::user_id.eq(owner))
                            .filter(feed_entries::message_id.eq_any(stale)),
                    )
                    .execute(conn)
                    .await?;
                }
                Ok(FeedAppend::Appended)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_common)
    }

    async fn entries(
        &self,
        recipient: &UserId,
        limit: usize,
    ) -> Result<Vec<FeedEntry>, FeedStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FeedStoreError::connection))?;

        let rows: Vec<FeedEntryRow> = feed_entries::table
            .filter(feed_entries::user_id.eq(*recipient.as_uuid()))
            .order((
                feed_entries::posted_at.desc(),
                feed_entries::message_id.desc(),
            ))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(FeedEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_common)?;

        rows.into_iter().map(row_to_entry).collect()
    }
}
