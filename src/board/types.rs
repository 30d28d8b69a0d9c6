//! Shared board types: board names, identities and timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{BoardError, Result};

/// Maximum board name length.
pub const MAX_BOARD_NAME_LENGTH: usize = 64;

/// Number of threads returned by a board listing.
pub const THREAD_LIST_LIMIT: i64 = 10;

/// Number of most recent replies embedded per thread in a board listing.
pub const REPLY_PREVIEW_LIMIT: i64 = 3;

/// Maximum length of thread and reply text, in characters.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Identity of a thread.
pub type ThreadId = Uuid;

/// Identity of a reply.
pub type ReplyId = Uuid;

/// A validated board name.
///
/// Boards have no table of their own; the name partitions threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardName(String);

impl BoardName {
    /// Validate a board name taken from a request path.
    ///
    /// Names are 1-64 characters of ASCII letters, digits, `-` and `_`.
    pub fn parse(name: &str) -> Result<Self> {
        let valid = !name.is_empty()
            && name.len() <= MAX_BOARD_NAME_LENGTH
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(BoardError::Validation("Board name is invalid.".to_string()))
        }
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the board view.
    pub fn view_path(&self) -> String {
        format!("/b/{}/", urlencoding::encode(&self.0))
    }

    /// Path of a thread view on this board.
    pub fn thread_view_path(&self, thread_id: ThreadId) -> String {
        format!("/b/{}/{}", urlencoding::encode(&self.0), thread_id)
    }
}

impl fmt::Display for BoardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a client-supplied identity. Returns `None` if it is malformed.
pub fn parse_id(value: &str) -> Option<Uuid> {
    Uuid::try_parse(value).ok()
}

/// Generate a fresh identity.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Current time truncated to the stored precision (microseconds).
pub fn now() -> DateTime<Utc> {
    from_micros(Utc::now().timestamp_micros())
}

/// Convert stored microseconds back into a timestamp.
pub(crate) fn from_micros(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}
