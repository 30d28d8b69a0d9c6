//! Response DTOs for the web API.
//!
//! Stored flags and password hashes never reach these types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::board::{Reply, Thread, ThreadPreview};

/// A reply as shown to clients.
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    /// Reply ID.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Reply text, `[deleted]` once redacted.
    pub text: String,
    /// Creation time.
    pub created_on: DateTime<Utc>,
}

impl From<Reply> for ReplyResponse {
    fn from(reply: Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text,
            created_on: reply.created_on,
        }
    }
}

/// A thread as shown to clients.
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    /// Thread ID.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Thread text.
    pub text: String,
    /// Creation time.
    pub created_on: DateTime<Utc>,
    /// Last bump time.
    pub bumped_on: DateTime<Utc>,
    /// Replies, oldest first.
    pub replies: Vec<ReplyResponse>,
}

impl From<Thread> for ThreadResponse {
    fn from(thread: Thread) -> Self {
        Self {
            id: thread.id,
            text: thread.text,
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            replies: thread.replies.into_iter().map(ReplyResponse::from).collect(),
        }
    }
}

/// A thread in a board listing.
#[derive(Debug, Serialize)]
pub struct ThreadListResponse {
    /// The thread with its reply preview.
    #[serde(flatten)]
    pub thread: ThreadResponse,
    /// Total number of replies, including those not previewed.
    pub replycount: i64,
}

impl From<ThreadPreview> for ThreadListResponse {
    fn from(preview: ThreadPreview) -> Self {
        Self {
            thread: preview.thread.into(),
            replycount: preview.reply_count,
        }
    }
}

/// Plain status message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// The `{"message":"success"}` body.
    pub fn success() -> Self {
        Self {
            message: "success".to_string(),
        }
    }
}

/// Body of a successful create.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    /// ID of the created thread or reply.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// View the client should navigate to.
    pub redirect: String,
    /// Thread the reply was added to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<Uuid>,
}
