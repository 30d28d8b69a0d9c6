//! Request DTOs for the web API.
//!
//! Every field is optional so that a missing field can be reported with the
//! operation's own message instead of a deserialization error.

use serde::Deserialize;
use validator::Validate;

use crate::auth::MAX_PASSWORD_LENGTH;
use crate::board::MAX_TEXT_LENGTH;

const TEXT_MAX: u64 = MAX_TEXT_LENGTH as u64;
const PASSWORD_MAX: u64 = MAX_PASSWORD_LENGTH as u64;

/// POST /api/threads/:board body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateThreadRequest {
    /// Thread text.
    #[validate(length(max = TEXT_MAX))]
    pub text: Option<String>,
    /// Password required to delete the thread later.
    #[validate(length(max = PASSWORD_MAX))]
    pub delete_password: Option<String>,
}

/// PUT /api/threads/:board body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ReportThreadRequest {
    /// Thread to report.
    pub thread_id: Option<String>,
}

/// DELETE /api/threads/:board body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DeleteThreadRequest {
    /// Thread to delete.
    pub thread_id: Option<String>,
    /// Password chosen at creation.
    #[validate(length(max = PASSWORD_MAX))]
    pub delete_password: Option<String>,
}

/// POST /api/replies/:board body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateReplyRequest {
    /// Thread to reply to.
    pub thread_id: Option<String>,
    /// Reply text.
    #[validate(length(max = TEXT_MAX))]
    pub text: Option<String>,
    /// Password required to delete the reply later.
    #[validate(length(max = PASSWORD_MAX))]
    pub delete_password: Option<String>,
}

/// GET /api/replies/:board query.
#[derive(Debug, Default, Deserialize)]
pub struct ThreadQuery {
    /// Thread to show.
    pub thread_id: Option<String>,
}

/// PUT /api/replies/:board body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ReportReplyRequest {
    /// Thread holding the reply.
    pub thread_id: Option<String>,
    /// Reply to report.
    pub reply_id: Option<String>,
}

/// DELETE /api/replies/:board body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DeleteReplyRequest {
    /// Thread holding the reply.
    pub thread_id: Option<String>,
    /// Reply to redact.
    pub reply_id: Option<String>,
    /// Password chosen when the reply was posted.
    #[validate(length(max = PASSWORD_MAX))]
    pub delete_password: Option<String>,
}

/// Return the field value if it was supplied and is not empty.
///
/// HTML forms submit empty inputs as empty strings; those count as missing.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}
