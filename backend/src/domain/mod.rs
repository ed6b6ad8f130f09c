//! Domain entities, services, and ports.
//!
//! Everything in this module is transport- and storage-agnostic. Inbound
//! adapters (HTTP) and outbound adapters (PostgreSQL, in-memory, queue,
//! argon2) meet the domain only through the types and traits exported here.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod fanout;
pub mod feed;
pub mod message;
pub mod ports;
pub mod timeline;
pub mod user;

pub use self::accounts::AccountService;
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, RegistrationRequest, RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode};
pub use self::fanout::{FanoutWorker, FanoutWorkerConfig};
pub use self::feed::{FeedEntry, FEED_RETENTION};
pub use self::message::{Message, MessageId, MessageText, MessageValidationError};
pub use self::timeline::{TimelineService, UserTimeline, FEED_PAGE_SIZE, TIMELINE_PAGE_SIZE};
pub use self::user::{
    AuthorProfile, Email, PasswordHash, User, UserId, UserValidationError, Username,
};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
