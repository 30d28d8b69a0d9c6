//! Reply handlers for the web API.

use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::board::{NewReply, ReplyRepository, ThreadRepository};
use crate::web::dto::{
    present, BoardForm, BoardPath, BoardQuery, CreateReplyRequest, CreatedResponse,
    DeleteReplyRequest, MessageResponse, ReportReplyRequest, ThreadQuery, ThreadResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::{identity, AppState};

/// POST /api/replies/:board - Reply to a thread and bump it.
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    BoardPath(board): BoardPath,
    BoardForm(req): BoardForm<CreateReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(raw_id), Some(text), Some(password)) = (
        present(&req.thread_id),
        present(&req.text),
        present(&req.delete_password),
    ) else {
        return Err(ApiError::bad_request(
            "To post a reply, thread_id, text and delete_password are required.",
        ));
    };
    let thread_id = identity(raw_id, "Thread id is invalid.")?;

    let hash = state.hash_password(password).await?;

    let reply = {
        let mut conn = state.connection().await?;
        ReplyRepository::new(&mut conn)
            .create(&board, thread_id, &NewReply::new(text, hash))
            .await
            .map_err(|e| {
                tracing::error!(board = %board, thread_id = %thread_id, "Failed to create reply: {}", e);
                ApiError::store(&e, "Error creating a reply")
            })?
            .ok_or_else(|| {
                ApiError::not_found(format!("Thread with id: {} is not found.", raw_id))
            })?
    };

    tracing::info!(board = %board, thread_id = %thread_id, reply_id = %reply.id, "Reply created");

    let redirect = board.thread_view_path(thread_id);
    Ok((
        StatusCode::OK,
        [(LOCATION, redirect.clone())],
        Json(CreatedResponse {
            id: reply.id,
            redirect,
            thread_id: Some(thread_id),
        }),
    ))
}

/// GET /api/replies/:board?thread_id= - Show a thread with all replies.
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    BoardPath(board): BoardPath,
    BoardQuery(query): BoardQuery<ThreadQuery>,
) -> Result<Json<ThreadResponse>, ApiError> {
    let Some(raw_id) = present(&query.thread_id) else {
        return Err(ApiError::bad_request("thread_id is missing."));
    };
    let thread_id = identity(raw_id, "thread_id is invalid.")?;

    let thread = {
        let mut conn = state.connection().await?;
        ThreadRepository::new(&mut conn)
            .get_by_id(&board, thread_id)
            .await
            .map_err(|e| {
                tracing::error!(board = %board, thread_id = %thread_id, "Failed to get thread: {}", e);
                ApiError::store(
                    &e,
                    format!("Error while fetch thread details of {}.", raw_id),
                )
            })?
            .ok_or_else(|| ApiError::not_found(format!("Thread with id {} not found.", raw_id)))?
    };

    Ok(Json(thread.into()))
}

/// PUT /api/replies/:board - Report a reply.
pub async fn report_reply(
    State(state): State<Arc<AppState>>,
    BoardPath(board): BoardPath,
    BoardForm(req): BoardForm<ReportReplyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (Some(raw_thread_id), Some(raw_reply_id)) =
        (present(&req.thread_id), present(&req.reply_id))
    else {
        return Err(ApiError::bad_request("thread_id and reply_id are required."));
    };
    let thread_id = identity(raw_thread_id, "thread_id is invalid.")?;
    let reply_id = identity(raw_reply_id, "reply_id is invalid.")?;

    let reported = {
        let mut conn = state.connection().await?;
        ReplyRepository::new(&mut conn)
            .report(&board, thread_id, reply_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    board = %board,
                    thread_id = %thread_id,
                    reply_id = %reply_id,
                    "Failed to report reply: {}",
                    e
                );
                ApiError::store(
                    &e,
                    format!("Error reporting reply on thread {}", raw_thread_id),
                )
            })?
    };

    if !reported {
        return Err(ApiError::not_found("Thread or reply not found."));
    }

    tracing::info!(board = %board, thread_id = %thread_id, reply_id = %reply_id, "Reply reported");
    Ok(Json(MessageResponse::success()))
}

/// DELETE /api/replies/:board - Redact a reply with its own password.
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    BoardPath(board): BoardPath,
    BoardForm(req): BoardForm<DeleteReplyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (Some(raw_thread_id), Some(raw_reply_id), Some(password)) = (
        present(&req.thread_id),
        present(&req.reply_id),
        present(&req.delete_password),
    ) else {
        return Err(ApiError::bad_request(
            "thread_id, reply_id and delete_password are required.",
        ));
    };
    let thread_id = identity(raw_thread_id, "thread_id is invalid.")?;
    let reply_id = identity(raw_reply_id, "reply_id is invalid.")?;

    let mut conn = state.connection().await?;

    let reply = ReplyRepository::new(&mut conn)
        .get(&board, thread_id, reply_id)
        .await
        .map_err(|e| {
            tracing::error!(
                board = %board,
                thread_id = %thread_id,
                reply_id = %reply_id,
                "Failed to find reply: {}",
                e
            );
            ApiError::store(&e, "Error while finding thread")
        })?
        .ok_or_else(|| ApiError::not_found("thread or reply not found."))?;

    // The reply's own hash; the thread password never unlocks a reply.
    if let Err(e) = state.check_password(password, &reply.delete_password).await {
        tracing::warn!(
            board = %board,
            thread_id = %thread_id,
            reply_id = %reply_id,
            "Reply delete password mismatch"
        );
        return Err(e);
    }

    let redacted = ReplyRepository::new(&mut conn)
        .redact(&board, thread_id, reply_id)
        .await
        .map_err(|e| {
            tracing::error!(
                board = %board,
                thread_id = %thread_id,
                reply_id = %reply_id,
                "Failed to redact reply: {}",
                e
            );
            ApiError::store(&e, format!("Error while deleting reply {}.", raw_reply_id))
        })?;

    // Thread deleted between lookup and redaction
    if !redacted {
        return Err(ApiError::not_found("thread or reply not found."));
    }

    tracing::info!(board = %board, thread_id = %thread_id, reply_id = %reply_id, "Reply redacted");
    Ok(Json(MessageResponse::success()))
}
