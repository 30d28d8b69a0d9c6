//! Reply model for anonboard.

use chrono::{DateTime, Utc};

use super::types::{from_micros, ReplyId, ThreadId};

/// Text a reply carries after redaction.
pub const REDACTED_TEXT: &str = "[deleted]";

/// A reply embedded in a thread.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Unique reply ID.
    pub id: ReplyId,
    /// Thread that owns this reply.
    pub thread_id: ThreadId,
    /// Reply text, or [`REDACTED_TEXT`] once deleted.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Whether the reply has been reported.
    pub reported: bool,
    /// Argon2 hash of the reply's own delete password.
    pub delete_password: String,
}

impl Reply {
    /// Whether the reply text has been redacted.
    pub fn is_redacted(&self) -> bool {
        self.text == REDACTED_TEXT
    }
}

/// Data for creating a new reply.
#[derive(Debug, Clone)]
pub struct NewReply {
    /// Reply text.
    pub text: String,
    /// Argon2 hash of the delete password.
    pub delete_password: String,
}

impl NewReply {
    /// Create a new reply. `delete_password` must already be hashed.
    pub fn new(text: impl Into<String>, delete_password: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delete_password: delete_password.into(),
        }
    }
}

/// Raw `replies` row.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ReplyRow {
    pub id: ReplyId,
    pub thread_id: ThreadId,
    pub text: String,
    pub created_on: i64,
    pub reported: bool,
    pub delete_password: String,
}

impl From<ReplyRow> for Reply {
    fn from(row: ReplyRow) -> Self {
        Self {
            id: row.id,
            thread_id: row.thread_id,
            text: row.text,
            created_on: from_micros(row.created_on),
            reported: row.reported,
            delete_password: row.delete_password,
        }
    }
}
