//! Board module for anonboard.
//!
//! This module provides the message board itself:
//! - Board names and identities
//! - Threads, bumped on every reply
//! - Replies, redacted instead of removed
//! - Repositories scoped to a board on a checked-out connection

mod reply;
mod reply_repository;
mod thread;
mod thread_repository;
mod types;

pub use reply::{NewReply, Reply, REDACTED_TEXT};
pub use reply_repository::ReplyRepository;
pub use thread::{NewThread, Thread, ThreadPreview};
pub use thread_repository::ThreadRepository;
pub use types::{
    new_id, now, parse_id, BoardName, ReplyId, ThreadId, MAX_BOARD_NAME_LENGTH, MAX_TEXT_LENGTH,
    REPLY_PREVIEW_LIMIT, THREAD_LIST_LIMIT,
};
