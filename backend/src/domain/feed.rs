//! Denormalized feed entries and the bounded in-order insertion rule.
//!
//! A feed is a per-user sequence of [`FeedEntry`] values kept in increasing
//! `(posted_at, message_id)` order, deduplicated by message id, and trimmed
//! to a retention cap on write. [`insert_bounded`] is the single place that
//! rule lives; feed store adapters call it rather than reimplementing it.

use chrono::{DateTime, Utc};

use super::message::{Message, MessageId, MessageText};
use super::user::AuthorProfile;

/// Maximum entries retained per feed; oldest entries are dropped on write.
pub const FEED_RETENTION: usize = 200;

/// Denormalized copy of a followed author's message.
///
/// Appended only by the fan-out worker; never updated. The author fields are
/// the snapshot taken when the message was posted.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// Originating message id; deduplication key for retried deliveries.
    pub message_id: MessageId,
    /// Author profile snapshot at post time.
    pub author: AuthorProfile,
    /// Message body.
    pub text: MessageText,
    /// Original post timestamp.
    pub posted_at: DateTime<Utc>,
}

impl FeedEntry {
    /// Snapshot a freshly posted message into a feed entry.
    pub fn from_message(message: &Message) -> Self {
        Self {
            message_id: *message.id(),
            author: message.author().clone(),
            text: message.text().clone(),
            posted_at: message.posted_at(),
        }
    }
}

/// Outcome of a feed append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedAppend {
    /// The entry was inserted.
    Appended,
    /// An entry with the same message id was already present; nothing changed.
    Duplicate,
}

/// Insert `entry` into `entries`, keeping increasing `(posted_at, message_id)`
/// order, ignoring duplicates by message id, and trimming the oldest entries
/// beyond `retain`.
///
/// Inserting by timestamp rather than appending keeps a recipient's feed in
/// post order even when deliveries are retried and arrive late.
///
/// # Examples
/// ```
/// use chirp::domain::feed::{insert_bounded, FeedAppend, FeedEntry};
/// # use chirp::domain::message::{Message, MessageId, MessageText};
/// # use chirp::domain::user::{AuthorProfile, Email, UserId, Username};
/// # use chrono::{TimeZone, Utc};
/// # let author = AuthorProfile {
/// #     id: UserId::random(),
/// #     username: Username::new("alice").unwrap(),
/// #     email: Email::new("alice@example.com").unwrap(),
/// # };
/// # let message = Message::new(
/// #     MessageId::random(),
/// #     author,
/// #     MessageText::new("hello").unwrap(),
/// #     Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
/// # );
/// let mut entries = Vec::new();
/// let entry = FeedEntry::from_message(&message);
/// assert_eq!(insert_bounded(&mut entries, entry.clone(), 200), FeedAppend::Appended);
/// assert_eq!(insert_bounded(&mut entries, entry, 200), FeedAppend::Duplicate);
/// assert_eq!(entries.len(), 1);
/// ```
pub fn insert_bounded(entries: &mut Vec<FeedEntry>, entry: FeedEntry, retain: usize) -> FeedAppend {
    if entries.iter().any(|e| e.message_id == entry.message_id) {
        return FeedAppend::Duplicate;
    }

    let key = (entry.posted_at, entry.message_id);
    let index = entries.partition_point(|e| (e.posted_at, e.message_id) <= key);
    entries.insert(index, entry);

    if entries.len() > retain {
        let excess = entries.len() - retain;
        entries.drain(..excess);
    }
    FeedAppend::Appended
}
