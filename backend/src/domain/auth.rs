//! Authentication and registration input primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Plaintext passwords are held in [`Zeroizing`] buffers and dropped as soon
//! as hashing or verification completes.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated login credentials used by [`crate::domain::accounts::AccountService`].
///
/// ## Invariants
/// - `username` is trimmed and non-empty; it is deliberately *not* a
///   [`Username`] so that a syntactically invalid login name flows through
///   lookup and fails as an unknown user rather than a validation error.
/// - `password` is non-empty but keeps caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation errors for registration payloads, in the order the checks run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// The username failed validation.
    InvalidUsername(UserValidationError),
    /// The email failed validation.
    InvalidEmail(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password confirmation did not match.
    PasswordMismatch,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUsername(err) | Self::InvalidEmail(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordMismatch => write!(f, "the two passwords do not match"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Validated registration payload.
///
/// Checks run in a fixed order and the first failure wins: username →
/// email → password non-empty → password confirmation. Username uniqueness
/// is the service's job, since only the user store can answer it.
#[derive(Debug)]
pub struct RegistrationRequest {
    username: Username,
    email: Email,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Construct a registration request from raw form inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        password2: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let username =
            Username::new(username).map_err(RegistrationValidationError::InvalidUsername)?;
        let email = Email::new(email).map_err(RegistrationValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        if password != password2 {
            return Err(RegistrationValidationError::PasswordMismatch);
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password, alive only until the service hashes it.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Split into the parts the service persists.
    pub(crate) fn into_parts(self) -> (Username, Email, Zeroizing<String>) {
        (self.username, self.email, self.password)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("   ", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("alice", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn credentials_trim_username_but_not_password() {
        let creds = LoginCredentials::try_from_parts("  alice  ", " secret ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), " secret ");
    }

    #[rstest]
    #[case("", "a@b.c", "pw", "pw", RegistrationValidationError::InvalidUsername(UserValidationError::EmptyUsername))]
    #[case("alice", "not-an-address", "pw", "pw", RegistrationValidationError::InvalidEmail(UserValidationError::EmailMissingAt))]
    #[case("alice", "a@b.c", "", "", RegistrationValidationError::EmptyPassword)]
    #[case("alice", "a@b.c", "pw", "other", RegistrationValidationError::PasswordMismatch)]
    fn registration_checks_run_in_order(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] password2: &str,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = RegistrationRequest::try_from_parts(username, email, password, password2)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn first_failing_check_wins() {
        // Both username and email are bad; the username check runs first.
        let err = RegistrationRequest::try_from_parts("", "nope", "", "x")
            .expect_err("invalid inputs must fail");
        assert_eq!(
            err,
            RegistrationValidationError::InvalidUsername(UserValidationError::EmptyUsername)
        );
    }

    #[test]
    fn valid_registration_passes() {
        let request = RegistrationRequest::try_from_parts("alice", "alice@example.com", "pw", "pw")
            .expect("valid inputs should succeed");
        assert_eq!(request.username().as_ref(), "alice");
        assert_eq!(request.email().as_ref(), "alice@example.com");
        assert_eq!(request.password(), "pw");
    }
}
