//! Message entity and text validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::AuthorProfile;

/// Maximum accepted message length in characters.
pub const MESSAGE_TEXT_MAX: usize = 280;

/// Validation errors returned by [`MessageText::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValidationError {
    /// Text was empty once trimmed.
    EmptyText,
    /// Text exceeds [`MESSAGE_TEXT_MAX`] characters.
    TextTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for MessageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "text must not be empty"),
            Self::TextTooLong { max } => write!(f, "text must be at most {max} characters"),
        }
    }
}

impl std::error::Error for MessageValidationError {}

/// Stable message identifier stored as a UUID v4.
///
/// Doubles as the deduplication key for feed appends: a retried fan-out
/// delivery carrying the same id is ignored by the feed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated message body.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`MESSAGE_TEXT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageText(String);

impl MessageText {
    /// Validate and construct a [`MessageText`].
    pub fn new(text: impl Into<String>) -> Result<Self, MessageValidationError> {
        let trimmed = text.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(MessageValidationError::EmptyText);
        }
        if trimmed.chars().count() > MESSAGE_TEXT_MAX {
            return Err(MessageValidationError::TextTooLong {
                max: MESSAGE_TEXT_MAX,
            });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for MessageText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<MessageText> for String {
    fn from(value: MessageText) -> Self {
        value.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = MessageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// An immutable posted message.
///
/// The author profile is a point-in-time snapshot; `posted_at` is assigned
/// from the injected clock when the message is created and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: MessageId,
    author: AuthorProfile,
    text: MessageText,
    posted_at: DateTime<Utc>,
}

impl Message {
    /// Assemble a message from validated parts.
    pub fn new(
        id: MessageId,
        author: AuthorProfile,
        text: MessageText,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author,
            text,
            posted_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Author profile snapshot taken at post time.
    pub fn author(&self) -> &AuthorProfile {
        &self.author
    }

    /// Message body.
    pub fn text(&self) -> &MessageText {
        &self.text
    }

    /// Creation timestamp.
    pub fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    fn blank_text_is_rejected(#[case] raw: &str) {
        let err = MessageText::new(raw).expect_err("blank text must fail");
        assert_eq!(err, MessageValidationError::EmptyText);
    }

    #[test]
    fn overlong_text_is_rejected() {
        let raw = "x".repeat(MESSAGE_TEXT_MAX + 1);
        let err = MessageText::new(raw).expect_err("overlong text must fail");
        assert_eq!(
            err,
            MessageValidationError::TextTooLong {
                max: MESSAGE_TEXT_MAX
            }
        );
    }

    #[test]
    fn text_is_trimmed() {
        let text = MessageText::new("  hello world  ").expect("valid text");
        assert_eq!(text.as_ref(), "hello world");
    }
}
