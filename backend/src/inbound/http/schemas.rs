//! JSON payloads served by the timeline endpoints.
//!
//! Messages and feed entries render identically, whether a row came from
//! the authoritative log or a feed cache, so both map onto [`MessageDto`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{FeedEntry, Message, UserTimeline};

/// One rendered timeline row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    /// Message identifier.
    pub id: Uuid,
    /// Author username at post time.
    pub username: String,
    /// Author email at post time (drives avatar rendering).
    pub email: String,
    /// Message body.
    pub text: String,
    /// Post timestamp.
    pub posted_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        let posted_at = message.posted_at();
        let id = *message.id().as_uuid();
        let author = message.author().clone();
        Self {
            id,
            username: author.username.into(),
            email: author.email.into(),
            text: message.text().as_ref().to_owned(),
            posted_at,
        }
    }
}

impl From<FeedEntry> for MessageDto {
    fn from(entry: FeedEntry) -> Self {
        Self {
            id: *entry.message_id.as_uuid(),
            username: entry.author.username.into(),
            email: entry.author.email.into(),
            text: entry.text.into(),
            posted_at: entry.posted_at,
        }
    }
}

/// A page of timeline rows (personal and public timelines).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimelinePage {
    /// Rows, newest first.
    pub messages: Vec<MessageDto>,
}

impl TimelinePage {
    /// Build a page from any collection of row sources.
    pub fn new<T: Into<MessageDto>>(rows: Vec<T>) -> Self {
        Self {
            messages: rows.into_iter().map(Into::into).collect(),
        }
    }
}

/// One author's timeline page plus the viewer's follow status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserTimelinePage {
    /// Page owner's username.
    pub username: String,
    /// Page owner's email.
    pub email: String,
    /// Whether the viewer currently follows the page owner.
    pub followed: bool,
    /// The owner's messages, newest first.
    pub messages: Vec<MessageDto>,
}

impl From<UserTimeline> for UserTimelinePage {
    fn from(timeline: UserTimeline) -> Self {
        Self {
            username: timeline.author.username.into(),
            email: timeline.author.email.into(),
            followed: timeline.followed,
            messages: timeline.messages.into_iter().map(Into::into).collect(),
        }
    }
}
