//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{feed_entries, follows, messages, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Insertable struct for creating follow edges.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub who: Uuid,
    pub whom: Uuid,
}

/// Row struct for reading from the messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_email: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

/// Insertable struct for appending messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: &'a str,
    pub author_email: &'a str,
    pub body: &'a str,
    pub posted_at: DateTime<Utc>,
}

/// Row struct for reading from the feed_entries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feed_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedEntryRow {
    pub user_id: Uuid,
    pub message_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_email: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

/// Insertable struct for feed appends.
///
/// Owns its strings so the row can move into the append transaction.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feed_entries)]
pub(crate) struct NewFeedEntryRow {
    pub user_id: Uuid,
    pub message_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_email: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}
