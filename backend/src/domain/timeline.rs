//! Timeline use-cases: posting, following, and the three timeline reads.
//!
//! Posting is a fast, durable, single write: the message is appended to the
//! store, then one fan-out delivery per current follower is enqueued for the
//! worker. The HTTP response never waits for deliveries to be applied, and a
//! fan-out problem is logged rather than failing the post.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use super::error::Error;
use super::feed::FeedEntry;
use super::message::{Message, MessageId, MessageText, MessageValidationError};
use super::ports::{
    FanoutDelivery, FanoutQueue, FeedRepository, FeedStoreError, FollowGraph, FollowGraphError,
    MessageStore, MessageStoreError, UserRepository, UserStoreError,
};
use super::user::{AuthorProfile, User, UserId, Username};

/// Page size for the public and per-user timelines.
pub const TIMELINE_PAGE_SIZE: usize = 30;
/// Page size for the personal (feed cache) timeline.
pub const FEED_PAGE_SIZE: usize = 20;

/// One author's timeline page plus the viewer's follow status.
#[derive(Debug, Clone)]
pub struct UserTimeline {
    /// The profile the page belongs to.
    pub author: AuthorProfile,
    /// The author's latest messages, newest first.
    pub messages: Vec<Message>,
    /// Whether the viewer currently follows the author.
    pub followed: bool,
}

fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::DuplicateUsername { username } => {
            Error::conflict(format!("username already taken: {username}"))
        }
        UserStoreError::Connection { message } => Error::service_unavailable(message),
        UserStoreError::Query { message } => Error::internal(message),
    }
}

fn map_message_store_error(error: MessageStoreError) -> Error {
    match error {
        MessageStoreError::Connection { message } => Error::service_unavailable(message),
        MessageStoreError::Query { message } => Error::internal(message),
    }
}

fn map_feed_store_error(error: FeedStoreError) -> Error {
    match error {
        FeedStoreError::Connection { message } => Error::service_unavailable(message),
        FeedStoreError::Query { message } => Error::internal(message),
    }
}

fn map_text_validation(error: MessageValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(serde_json::json!({
        "field": "text",
        "code": match error {
            MessageValidationError::EmptyText => "empty_text",
            MessageValidationError::TextTooLong { .. } => "text_too_long",
        },
    }))
}

/// Posting, following, and timeline reads over the entity ports.
#[derive(Clone)]
pub struct TimelineService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowGraph>,
    messages: Arc<dyn MessageStore>,
    feeds: Arc<dyn FeedRepository>,
    queue: Arc<dyn FanoutQueue>,
    clock: Arc<dyn Clock>,
}

impl TimelineService {
    /// Create a service over the given ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        follows: Arc<dyn FollowGraph>,
        messages: Arc<dyn MessageStore>,
        feeds: Arc<dyn FeedRepository>,
        queue: Arc<dyn FanoutQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            follows,
            messages,
            feeds,
            queue,
            clock,
        }
    }

    /// Post a new message for `author`.
    ///
    /// The follower set is snapshotted at this instant: followers added
    /// afterwards do not retroactively receive the entry. Enqueue problems
    /// are logged and never fail the post; the message is already durable.
    pub async fn post_message(&self, author: &User, text: &str) -> Result<Message, Error> {
        let text = MessageText::new(text).map_err(map_text_validation)?;
        let message = Message::new(
            MessageId::random(),
            author.profile(),
            text,
            self.clock.utc(),
        );
        self.messages
            .append(&message)
            .await
            .map_err(map_message_store_error)?;

        match self.follows.followers_of(author.id()).await {
            Ok(followers) => {
                let entry = FeedEntry::from_message(&message);
                for recipient in followers {
                    let delivery = FanoutDelivery {
                        recipient,
                        entry: entry.clone(),
                    };
                    if let Err(error) = self.queue.enqueue(delivery).await {
                        warn!(
                            %recipient,
                            message_id = %message.id(),
                            %error,
                            "failed to enqueue fan-out delivery"
                        );
                    }
                }
            }
            Err(error) => {
                warn!(
                    author_id = %author.id(),
                    message_id = %message.id(),
                    %error,
                    "failed to read followers for fan-out"
                );
            }
        }
        Ok(message)
    }

    /// The personal timeline: `user`'s feed cache, newest first.
    pub async fn personal_timeline(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<FeedEntry>, Error> {
        self.feeds
            .entries(user, limit)
            .await
            .map_err(map_feed_store_error)
    }

    /// The public timeline: latest messages across all authors.
    pub async fn public_timeline(&self, limit: usize) -> Result<Vec<Message>, Error> {
        self.messages
            .list_all(limit)
            .await
            .map_err(map_message_store_error)
    }

    /// One author's timeline plus the viewer's follow status.
    pub async fn user_timeline(
        &self,
        username: &Username,
        viewer: Option<&UserId>,
        limit: usize,
    ) -> Result<UserTimeline, Error> {
        let user = self.lookup(username).await?;
        let messages = self
            .messages
            .list_by_author(user.id(), limit)
            .await
            .map_err(map_message_store_error)?;
        let followed = match viewer {
            Some(viewer) => self
                .follows
                .is_following(viewer, user.id())
                .await
                .map_err(Self::map_follow_graph_error)?,
            None => false,
        };
        Ok(UserTimeline {
            author: user.profile(),
            messages,
            followed,
        })
    }

    /// Make `who` follow the user named `whom`.
    ///
    /// Self-follow is rejected with `InvalidRequest`; a duplicate follow is
    /// rejected with `Conflict`; the edge is unique by policy.
    pub async fn follow(&self, who: &UserId, whom: &Username) -> Result<Username, Error> {
        let target = self.lookup(whom).await?;
        if who == target.id() {
            return Err(Error::invalid_request("cannot follow yourself"));
        }
        self.follows
            .insert(who, target.id())
            .await
            .map_err(Self::map_follow_graph_error)?;
        Ok(target.username().clone())
    }

    /// Make `who` stop following the user named `whom`.
    ///
    /// Removing an edge that does not exist fails with `NotFound`, never
    /// silently succeeds.
    pub async fn unfollow(&self, who: &UserId, whom: &Username) -> Result<Username, Error> {
        let target = self.lookup(whom).await?;
        self.follows
            .remove(who, target.id())
            .await
            .map_err(Self::map_follow_graph_error)?;
        Ok(target.username().clone())
    }

    async fn lookup(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found(format!("no such user: {username}")))
    }

    fn map_follow_graph_error(error: FollowGraphError) -> Error {
        match error {
            FollowGraphError::DuplicateEdge => Error::conflict("already following this user"),
            FollowGraphError::EdgeNotFound => Error::not_found("not following this user"),
            FollowGraphError::Connection { message } => Error::service_unavailable(message),
            FollowGraphError::Query { message } => Error::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::DeliveryDispatchError;
    use crate::domain::user::{Email, PasswordHash};
    use crate::domain::ErrorCode;
    use crate::outbound::memory::{
        MemoryFeedRepository, MemoryFollowGraph, MemoryMessageStore, MemoryUserRepository,
    };

    /// Clock pinned to a fixed instant.
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Queue double that records deliveries instead of dispatching them.
    #[derive(Default)]
    struct RecordingQueue {
        deliveries: Mutex<Vec<FanoutDelivery>>,
        fail: bool,
    }

    impl RecordingQueue {
        fn failing() -> Self {
            Self {
                deliveries: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn recorded(&self) -> Vec<FanoutDelivery> {
            self.deliveries.lock().expect("deliveries lock").clone()
        }
    }

    #[async_trait]
    impl FanoutQueue for RecordingQueue {
        async fn enqueue(&self, delivery: FanoutDelivery) -> Result<(), DeliveryDispatchError> {
            if self.fail {
                return Err(DeliveryDispatchError::closed("test queue rejects"));
            }
            self.deliveries
                .lock()
                .expect("deliveries lock")
                .push(delivery);
            Ok(())
        }
    }

    struct Fixture {
        users: Arc<MemoryUserRepository>,
        follows: Arc<MemoryFollowGraph>,
        queue: Arc<RecordingQueue>,
        service: TimelineService,
    }

    fn fixture_with_queue(queue: RecordingQueue) -> Fixture {
        let users = Arc::new(MemoryUserRepository::default());
        let follows = Arc::new(MemoryFollowGraph::default());
        let messages = Arc::new(MemoryMessageStore::default());
        let feeds = Arc::new(MemoryFeedRepository::default());
        let queue = Arc::new(queue);
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        ));
        let service = TimelineService::new(
            users.clone(),
            follows.clone(),
            messages,
            feeds,
            queue.clone(),
            clock,
        );
        Fixture {
            users,
            follows,
            queue,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_queue(RecordingQueue::default())
    }

    async fn seed_user(fixture: &Fixture, name: &str) -> User {
        let user = User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            Email::new(format!("{name}@example.com")).expect("valid email"),
            PasswordHash::from_encoded("$argon2id$stub"),
        );
        fixture.users.insert(&user).await.expect("user inserted");
        user
    }

    #[tokio::test]
    async fn post_rejects_blank_text() {
        let fixture = fixture();
        let alice = seed_user(&fixture, "alice").await;

        let err = fixture
            .service
            .post_message(&alice, "   ")
            .await
            .expect_err("blank text must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn post_appears_first_in_author_timeline() {
        let fixture = fixture();
        let alice = seed_user(&fixture, "alice").await;

        fixture
            .service
            .post_message(&alice, "hello")
            .await
            .expect("post succeeds");
        let timeline = fixture
            .service
            .user_timeline(alice.username(), None, TIMELINE_PAGE_SIZE)
            .await
            .expect("timeline loads");
        let first = timeline.messages.first().expect("message present");
        assert_eq!(first.text().as_ref(), "hello");
        assert!(!timeline.followed);
    }

    #[tokio::test]
    async fn post_enqueues_one_delivery_per_follower() {
        let fixture = fixture();
        let alice = seed_user(&fixture, "alice").await;
        let bob = seed_user(&fixture, "bob").await;
        let carol = seed_user(&fixture, "carol").await;
        for follower in [&bob, &carol] {
            fixture
                .follows
                .insert(follower.id(), alice.id())
                .await
                .expect("edge inserted");
        }

        let message = fixture
            .service
            .post_message(&alice, "hello")
            .await
            .expect("post succeeds");

        let deliveries = fixture.queue.recorded();
        assert_eq!(deliveries.len(), 2);
        let mut recipients: Vec<UserId> = deliveries.iter().map(|d| d.recipient).collect();
        recipients.sort();
        let mut expected = vec![*bob.id(), *carol.id()];
        expected.sort();
        assert_eq!(recipients, expected);
        for delivery in &deliveries {
            assert_eq!(delivery.entry.message_id, *message.id());
            assert_eq!(delivery.entry.text.as_ref(), "hello");
            assert_eq!(delivery.entry.author.username.as_ref(), "alice");
        }
    }

    #[tokio::test]
    async fn post_succeeds_when_queue_rejects() {
        let fixture = fixture_with_queue(RecordingQueue::failing());
        let alice = seed_user(&fixture, "alice").await;
        let bob = seed_user(&fixture, "bob").await;
        fixture
            .follows
            .insert(bob.id(), alice.id())
            .await
            .expect("edge inserted");

        let message = fixture
            .service
            .post_message(&alice, "hello")
            .await
            .expect("post must succeed despite queue failure");
        let authored = fixture
            .service
            .user_timeline(alice.username(), None, TIMELINE_PAGE_SIZE)
            .await
            .expect("timeline loads");
        assert_eq!(authored.messages.first().map(Message::id), Some(message.id()));
    }

    #[tokio::test]
    async fn follow_self_is_rejected() {
        let fixture = fixture();
        let alice = seed_user(&fixture, "alice").await;

        let err = fixture
            .service
            .follow(alice.id(), alice.username())
            .await
            .expect_err("self-follow must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn duplicate_follow_is_a_conflict() {
        let fixture = fixture();
        let alice = seed_user(&fixture, "alice").await;
        let bob = seed_user(&fixture, "bob").await;

        fixture
            .service
            .follow(bob.id(), alice.username())
            .await
            .expect("first follow succeeds");
        let err = fixture
            .service
            .follow(bob.id(), alice.username())
            .await
            .expect_err("duplicate follow must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
        // The graph still holds exactly one edge.
        assert_eq!(
            fixture
                .follows
                .followers_of(alice.id())
                .await
                .expect("followers load"),
            vec![*bob.id()]
        );
    }

    #[tokio::test]
    async fn unfollow_without_edge_is_not_found() {
        let fixture = fixture();
        let alice = seed_user(&fixture, "alice").await;
        let bob = seed_user(&fixture, "bob").await;

        let err = fixture
            .service
            .unfollow(bob.id(), alice.username())
            .await
            .expect_err("unfollow without edge must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case("follow")]
    #[case("unfollow")]
    #[tokio::test]
    async fn follow_ops_on_unknown_user_are_not_found(#[case] op: &str) {
        let fixture = fixture();
        let bob = seed_user(&fixture, "bob").await;
        let ghost = Username::new("ghost").expect("valid username");

        let err = match op {
            "follow" => fixture.service.follow(bob.id(), &ghost).await,
            _ => fixture.service.unfollow(bob.id(), &ghost).await,
        }
        .expect_err("unknown user must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn user_timeline_reports_follow_status() {
        let fixture = fixture();
        let alice = seed_user(&fixture, "alice").await;
        let bob = seed_user(&fixture, "bob").await;
        fixture
            .service
            .follow(bob.id(), alice.username())
            .await
            .expect("follow succeeds");

        let as_bob = fixture
            .service
            .user_timeline(alice.username(), Some(bob.id()), TIMELINE_PAGE_SIZE)
            .await
            .expect("timeline loads");
        assert!(as_bob.followed);

        let anonymous = fixture
            .service
            .user_timeline(alice.username(), None, TIMELINE_PAGE_SIZE)
            .await
            .expect("timeline loads");
        assert!(!anonymous.followed);
    }
}
