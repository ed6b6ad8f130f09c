//! User identity and profile primitives.
//!
//! Constructors validate string inputs at the boundary so services and
//! adapters only ever see well-formed values. Credentials are stored as an
//! opaque [`PasswordHash`]; plaintext passwords never reach this module.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username exceeds [`USERNAME_MAX`] characters.
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Username contains characters outside letters, digits, and underscore.
    UsernameInvalidCharacters,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not contain an `@`.
    EmailMissingAt,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, digits, or underscores"
            ),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailMissingAt => write!(f, "email must contain an @"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum accepted username length in characters.
pub const USERNAME_MAX: usize = 32;

/// Unique login name for a user.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`USERNAME_MAX`] characters.
/// - Contains only ASCII letters, digits, or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = username.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact email address.
///
/// Validation is deliberately shallow: trimmed, non-empty, and containing an
/// `@`. Anything stricter belongs to a confirmation mail flow, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = email.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !trimmed.contains('@') {
            return Err(UserValidationError::EmailMissingAt);
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque salted password hash in PHC string format.
///
/// Constructed only by the password hashing adapter; never derived from or
/// compared against plaintext inside the domain.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string produced by a hashing adapter.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded hash string, for persistence and verification only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Point-in-time snapshot of an author's public profile.
///
/// Copied into messages and feed entries at post time; later profile edits
/// do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorProfile {
    /// Author identifier.
    pub id: UserId,
    /// Author username at post time.
    pub username: Username,
    /// Author email at post time (drives avatar rendering downstream).
    pub email: Email,
}

/// A registered user account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: Username,
    email: Email,
    password_hash: PasswordHash,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(id: UserId, username: Username, email: Email, password_hash: PasswordHash) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored credential hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Snapshot the public profile fields for embedding into posts.
    pub fn profile(&self) -> AuthorProfile {
        AuthorProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("has space", UserValidationError::UsernameInvalidCharacters)]
    #[case("dots.are.bad", UserValidationError::UsernameInvalidCharacters)]
    fn invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = Username::new(raw).expect_err("invalid username must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn overlong_username_is_rejected() {
        let raw = "x".repeat(USERNAME_MAX + 1);
        let err = Username::new(raw).expect_err("overlong username must fail");
        assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
    }

    #[rstest]
    #[case("  alice  ", "alice")]
    #[case("bob_42", "bob_42")]
    fn valid_usernames_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
        let username = Username::new(raw).expect("valid username");
        assert_eq!(username.as_ref(), expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("not-an-address", UserValidationError::EmailMissingAt)]
    fn invalid_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = Email::new(raw).expect_err("invalid email must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::from_encoded("$argon2id$v=19$m=19456,t=2,p=1$abc$def");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[test]
    fn profile_snapshot_copies_fields() {
        let user = User::new(
            UserId::random(),
            Username::new("alice").expect("valid username"),
            Email::new("alice@example.com").expect("valid email"),
            PasswordHash::from_encoded("$argon2id$stub"),
        );
        let profile = user.profile();
        assert_eq!(&profile.id, user.id());
        assert_eq!(profile.username.as_ref(), "alice");
        assert_eq!(profile.email.as_ref(), "alice@example.com");
    }
}
