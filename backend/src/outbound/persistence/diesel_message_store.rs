//! PostgreSQL-backed [`MessageStore`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::message::{Message, MessageId, MessageText};
use crate::domain::ports::{MessageStore, MessageStoreError};
use crate::domain::user::{AuthorProfile, Email, UserId, Username};

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::{MessageRow, NewMessageRow};
use super::pool::DbPool;
use super::schema::messages;

/// Diesel-backed implementation of the [`MessageStore`] port.
#[derive(Clone)]
pub struct DieselMessageStore {
    pool: DbPool,
}

impl DieselMessageStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_common(error: diesel::result::Error) -> MessageStoreError {
    map_diesel_error(error, MessageStoreError::query, MessageStoreError::connection)
}

fn page_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Rebuild a domain message from a database row.
fn row_to_message(row: MessageRow) -> Result<Message, MessageStoreError> {
    let username = Username::new(row.author_username)
        .map_err(|err| MessageStoreError::query(format!("stored username is invalid: {err}")))?;
    let email = Email::new(row.author_email)
        .map_err(|err| MessageStoreError::query(format!("stored email is invalid: {err}")))?;
    let text = MessageText::new(row.body)
        .map_err(|err| MessageStoreError::query(format!("stored body is invalid: {err}")))?;
    Ok(Message::new(
        MessageId::from_uuid(row.id),
        AuthorProfile {
            id: UserId::from_uuid(row.author_id),
            username,
            email,
        },
        text,
        row.posted_at,
    ))
}

#[async_trait]
impl MessageStore for DieselMessageStore {
    async fn append(&self, message: &Message) -> Result<(), MessageStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MessageStoreError::connection))?;

        let row = NewMessageRow {
            id: *message.id().as_uuid(),
            author_id: *message.author().id.as_uuid(),
            author_username: message.author().username.as_ref(),
            author_email: message.author().email.as_ref(),
            body: message.text().as_ref(),
            posted_at: message.posted_at(),
        };
        diesel::insert_into(messages::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_common)?;
        Ok(())
    }

    async fn list_all(&self, limit: usize) -> Result<Vec<Message>, MessageStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MessageStoreError::connection))?;

        let rows: Vec<MessageRow> = messages::table
            .order((messages::posted_at.desc(), messages::id.desc()))
            .limit(page_limit(limit))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_common)?;

        rows.into_iter().map(row_to_message).collect()
    }

    async fn list_by_author(
        &self,
        author: &UserId,
        limit: usize,
    ) -> Result<Vec<Message>, MessageStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MessageStoreError::connection))?;

        let rows: Vec<MessageRow> = messages::table
            .filter(messages::author_id.eq(*author.as_uuid()))
            .order((messages::posted_at.desc(), messages::id.desc()))
            .limit(page_limit(limit))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_common)?;

        rows.into_iter().map(row_to_message).collect()
    }
}
