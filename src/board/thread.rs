//! Thread model for anonboard.

use chrono::{DateTime, Utc};

use super::reply::Reply;
use super::types::{from_micros, ThreadId};

/// A discussion thread with its embedded replies.
#[derive(Debug, Clone)]
pub struct Thread {
    /// Unique thread ID.
    pub id: ThreadId,
    /// Board this thread belongs to.
    pub board: String,
    /// Thread text.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last bump (creation, or the most recent reply).
    pub bumped_on: DateTime<Utc>,
    /// Whether the thread has been reported.
    pub reported: bool,
    /// Argon2 hash of the delete password.
    pub delete_password: String,
    /// Replies in insertion order.
    pub replies: Vec<Reply>,
}

/// A thread as shown in a board listing: only the most recent replies are
/// embedded, `reply_count` holds the full count.
#[derive(Debug, Clone)]
pub struct ThreadPreview {
    /// The thread, with `replies` truncated to the preview.
    pub thread: Thread,
    /// Total number of replies on the thread.
    pub reply_count: i64,
}

/// Data for creating a new thread.
#[derive(Debug, Clone)]
pub struct NewThread {
    /// Thread text.
    pub text: String,
    /// Argon2 hash of the delete password.
    pub delete_password: String,
}

impl NewThread {
    /// Create a new thread. `delete_password` must already be hashed.
    pub fn new(text: impl Into<String>, delete_password: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delete_password: delete_password.into(),
        }
    }
}

/// Raw `threads` row.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ThreadRow {
    pub id: ThreadId,
    pub board: String,
    pub text: String,
    pub created_on: i64,
    pub bumped_on: i64,
    pub reported: bool,
    pub delete_password: String,
}

impl ThreadRow {
    pub(super) fn into_thread(self, replies: Vec<Reply>) -> Thread {
        Thread {
            id: self.id,
            board: self.board,
            text: self.text,
            created_on: from_micros(self.created_on),
            bumped_on: from_micros(self.bumped_on),
            reported: self.reported,
            delete_password: self.delete_password,
            replies,
        }
    }
}
