//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly; regenerate with `diesel print-schema` after schema changes.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Contact email.
        email -> Varchar,
        /// Argon2id credential hash in PHC string format.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges: `who` follows `whom`.
    follows (who, whom) {
        /// Follower user id.
        who -> Uuid,
        /// Followed user id.
        whom -> Uuid,
        /// Edge creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Authoritative append-only message log.
    messages (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Author user id.
        author_id -> Uuid,
        /// Author username snapshot at post time.
        author_username -> Varchar,
        /// Author email snapshot at post time.
        author_email -> Varchar,
        /// Message body.
        body -> Text,
        /// Post timestamp.
        posted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Denormalized per-user feed caches, one row per delivered entry.
    feed_entries (user_id, message_id) {
        /// Feed owner (the recipient).
        user_id -> Uuid,
        /// Originating message id; part of the key for idempotent appends.
        message_id -> Uuid,
        /// Author user id snapshot.
        author_id -> Uuid,
        /// Author username snapshot.
        author_username -> Varchar,
        /// Author email snapshot.
        author_email -> Varchar,
        /// Message body copy.
        body -> Text,
        /// Original post timestamp.
        posted_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, follows, messages, feed_entries);
