//! In-memory adapters for the entity ports.
//!
//! These back the server when no `DATABASE_URL` is configured (local
//! development) and are the substrate for service and HTTP tests. They
//! enforce the same contracts as the PostgreSQL adapters: unique usernames,
//! unique follow edges, newest-first reads, and bounded idempotent feed
//! appends.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use crate::domain::feed::{insert_bounded, FeedAppend, FeedEntry, FEED_RETENTION};
use crate::domain::message::Message;
use crate::domain::ports::{
    FeedRepository, FeedStoreError, FollowGraph, FollowGraphError, MessageStore,
    MessageStoreError, UserRepository, UserStoreError,
};
use crate::domain::user::{User, UserId, Username};

/// In-memory [`UserRepository`].
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().expect("user store lock");
        if users.iter().any(|u| u.username() == user.username()) {
            return Err(UserStoreError::duplicate_username(user.username().as_ref()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().expect("user store lock");
        Ok(users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().expect("user store lock");
        Ok(users.iter().find(|u| u.username() == username).cloned())
    }
}

/// In-memory [`FollowGraph`] over a set of `(who, whom)` pairs.
#[derive(Default)]
pub struct MemoryFollowGraph {
    edges: RwLock<HashSet<(UserId, UserId)>>,
}

#[async_trait]
impl FollowGraph for MemoryFollowGraph {
    async fn insert(&self, who: &UserId, whom: &UserId) -> Result<(), FollowGraphError> {
        let mut edges = self.edges.write().expect("follow graph lock");
        if !edges.insert((*who, *whom)) {
            return Err(FollowGraphError::DuplicateEdge);
        }
        Ok(())
    }

    async fn remove(&self, who: &UserId, whom: &UserId) -> Result<(), FollowGraphError> {
        let mut edges = self.edges.write().expect("follow graph lock");
        if !edges.remove(&(*who, *whom)) {
            return Err(FollowGraphError::EdgeNotFound);
        }
        Ok(())
    }

    async fn is_following(&self, who: &UserId, whom: &UserId) -> Result<bool, FollowGraphError> {
        let edges = self.edges.read().expect("follow graph lock");
        Ok(edges.contains(&(*who, *whom)))
    }

    async fn followers_of(&self, user: &UserId) -> Result<Vec<UserId>, FollowGraphError> {
        let edges = self.edges.read().expect("follow graph lock");
        let mut followers: Vec<UserId> = edges
            .iter()
            .filter(|(_, whom)| whom == user)
            .map(|(who, _)| *who)
            .collect();
        // Deterministic order keeps tests and logs stable.
        followers.sort();
        Ok(followers)
    }
}

/// In-memory append-only [`MessageStore`].
#[derive(Default)]
pub struct MemoryMessageStore {
    messages: RwLock<Vec<Message>>,
}

impl MemoryMessageStore {
    fn newest_first(messages: &[Message], limit: usize) -> Vec<Message> {
        let mut page: Vec<Message> = messages.to_vec();
        // Stable sort: equal timestamps keep append order before reversal.
        page.sort_by_key(Message::posted_at);
        page.reverse();
        page.truncate(limit);
        page
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn append(&self, message: &Message) -> Result<(), MessageStoreError> {
        let mut messages = self.messages.write().expect("message store lock");
        messages.push(message.clone());
        Ok(())
    }

    async fn list_all(&self, limit: usize) -> Result<Vec<Message>, MessageStoreError> {
        let messages = self.messages.read().expect("message store lock");
        Ok(Self::newest_first(&messages, limit))
    }

    async fn list_by_author(
        &self,
        author: &UserId,
        limit: usize,
    ) -> Result<Vec<Message>, MessageStoreError> {
        let messages = self.messages.read().expect("message store lock");
        let authored: Vec<Message> = messages
            .iter()
            .filter(|m| m.author().id == *author)
            .cloned()
            .collect();
        Ok(Self::newest_first(&authored, limit))
    }
}

/// In-memory [`FeedRepository`] with one lock per recipient.
///
/// The outer map lock is held only to look up or create a recipient's feed
/// handle; appends for different recipients proceed concurrently.
#[derive(Default)]
pub struct MemoryFeedRepository {
    feeds: RwLock<HashMap<UserId, Arc<Mutex<Vec<FeedEntry>>>>>,
}

impl MemoryFeedRepository {
    fn feed_of(&self, recipient: &UserId) -> Arc<Mutex<Vec<FeedEntry>>> {
        if let Some(feed) = self.feeds.read().expect("feed map lock").get(recipient) {
            return feed.clone();
        }
        self.feeds
            .write()
            .expect("feed map lock")
            .entry(*recipient)
            .or_default()
            .clone()
    }
}

#[async_trait]
impl FeedRepository for MemoryFeedRepository {
    async fn append(
        &self,
        recipient: &UserId,
        entry: FeedEntry,
    ) -> Result<FeedAppend, FeedStoreError> {
        let feed = self.feed_of(recipient);
        let mut entries = feed.lock().expect("feed lock");
        Ok(insert_bounded(&mut entries, entry, FEED_RETENTION))
    }

    async fn entries(
        &self,
        recipient: &UserId,
        limit: usize,
    ) -> Result<Vec<FeedEntry>, FeedStoreError> {
        let feed = self.feed_of(recipient);
        let entries = feed.lock().expect("feed lock");
        // Stored ascending; serve the newest `limit`, newest first.
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::message::{MessageId, MessageText};
    use crate::domain::user::{Email, PasswordHash};

    fn user(name: &str) -> User {
        User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            Email::new(format!("{name}@example.com")).expect("valid email"),
            PasswordHash::from_encoded("$argon2id$stub"),
        )
    }

    fn message(author: &User, text: &str, minute: u32) -> Message {
        Message::new(
            MessageId::random(),
            author.profile(),
            MessageText::new(text).expect("valid text"),
            Utc.with_ymd_and_hms(2026, 8, 1, 12, minute, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    #[tokio::test]
    async fn user_repository_enforces_unique_usernames() {
        let store = MemoryUserRepository::default();
        store.insert(&user("alice")).await.expect("first insert");

        let err = store
            .insert(&user("alice"))
            .await
            .expect_err("duplicate username must fail");
        assert!(matches!(err, UserStoreError::DuplicateUsername { .. }));
    }

    #[tokio::test]
    async fn user_repository_finds_by_both_keys() {
        let store = MemoryUserRepository::default();
        let alice = user("alice");
        store.insert(&alice).await.expect("insert");

        let by_id = store.find_by_id(alice.id()).await.expect("lookup");
        assert_eq!(by_id.as_ref().map(User::id), Some(alice.id()));
        let by_name = store
            .find_by_username(alice.username())
            .await
            .expect("lookup");
        assert_eq!(by_name.as_ref().map(User::id), Some(alice.id()));
        let missing = store
            .find_by_username(&Username::new("ghost").expect("valid username"))
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn follow_graph_rejects_duplicates_and_missing_edges() {
        let graph = MemoryFollowGraph::default();
        let (a, b) = (UserId::random(), UserId::random());

        graph.insert(&a, &b).await.expect("edge inserted");
        assert_eq!(
            graph.insert(&a, &b).await.expect_err("duplicate edge"),
            FollowGraphError::DuplicateEdge
        );
        assert!(graph.is_following(&a, &b).await.expect("check"));
        // Direction matters.
        assert!(!graph.is_following(&b, &a).await.expect("check"));

        graph.remove(&a, &b).await.expect("edge removed");
        assert_eq!(
            graph.remove(&a, &b).await.expect_err("missing edge"),
            FollowGraphError::EdgeNotFound
        );
    }

    #[tokio::test]
    async fn followers_of_only_sees_incoming_edges() {
        let graph = MemoryFollowGraph::default();
        let (a, b, c) = (UserId::random(), UserId::random(), UserId::random());
        graph.insert(&b, &a).await.expect("edge inserted");
        graph.insert(&c, &a).await.expect("edge inserted");
        graph.insert(&a, &b).await.expect("edge inserted");

        let mut expected = vec![b, c];
        expected.sort();
        assert_eq!(graph.followers_of(&a).await.expect("followers"), expected);
    }

    #[tokio::test]
    async fn message_store_lists_newest_first() {
        let store = MemoryMessageStore::default();
        let alice = user("alice");
        let bob = user("bob");
        store.append(&message(&alice, "a1", 0)).await.expect("append");
        store.append(&message(&bob, "b1", 1)).await.expect("append");
        store.append(&message(&alice, "a2", 2)).await.expect("append");

        let all = store.list_all(10).await.expect("list");
        let texts: Vec<&str> = all.iter().map(|m| m.text().as_ref()).collect();
        assert_eq!(texts, vec!["a2", "b1", "a1"]);

        let authored = store.list_by_author(alice.id(), 10).await.expect("list");
        let texts: Vec<&str> = authored.iter().map(|m| m.text().as_ref()).collect();
        assert_eq!(texts, vec!["a2", "a1"]);

        let limited = store.list_all(2).await.expect("list");
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn feed_repository_deduplicates_and_serves_newest_first() {
        let feeds = MemoryFeedRepository::default();
        let bob = UserId::random();
        let alice = user("alice");
        let older = FeedEntry::from_message(&message(&alice, "older", 0));
        let newer = FeedEntry::from_message(&message(&alice, "newer", 1));

        assert_eq!(
            feeds.append(&bob, older.clone()).await.expect("append"),
            FeedAppend::Appended
        );
        assert_eq!(
            feeds.append(&bob, newer).await.expect("append"),
            FeedAppend::Appended
        );
        assert_eq!(
            feeds.append(&bob, older).await.expect("append"),
            FeedAppend::Duplicate
        );

        let entries = feeds.entries(&bob, 20).await.expect("entries");
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_ref()).collect();
        assert_eq!(texts, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn feed_repository_isolates_recipients() {
        let feeds = MemoryFeedRepository::default();
        let (bob, carol) = (UserId::random(), UserId::random());
        let alice = user("alice");
        feeds
            .append(&bob, FeedEntry::from_message(&message(&alice, "for bob", 0)))
            .await
            .expect("append");

        assert!(feeds.entries(&carol, 20).await.expect("entries").is_empty());
    }
}
