//! Thread handlers for the web API.

use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::board::{NewThread, ThreadRepository, REPLY_PREVIEW_LIMIT, THREAD_LIST_LIMIT};
use crate::web::dto::{
    present, BoardForm, BoardPath, CreateThreadRequest, CreatedResponse, DeleteThreadRequest,
    MessageResponse, ReportThreadRequest, ThreadListResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::{identity, AppState};

/// POST /api/threads/:board - Create a new thread.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    BoardPath(board): BoardPath,
    BoardForm(req): BoardForm<CreateThreadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(text), Some(password)) = (present(&req.text), present(&req.delete_password)) else {
        return Err(ApiError::bad_request(
            "To create a thread text and delete_password is required.",
        ));
    };

    let hash = state.hash_password(password).await?;

    let thread = {
        let mut conn = state.connection().await?;
        ThreadRepository::new(&mut conn)
            .create(&board, &NewThread::new(text, hash))
            .await
            .map_err(|e| {
                tracing::error!(board = %board, "Failed to create thread: {}", e);
                ApiError::store(&e, "Error creating thread")
            })?
    };

    tracing::info!(board = %board, thread_id = %thread.id, "Thread created");

    let redirect = board.view_path();
    Ok((
        StatusCode::OK,
        [(LOCATION, redirect.clone())],
        Json(CreatedResponse {
            id: thread.id,
            redirect,
            thread_id: None,
        }),
    ))
}

/// GET /api/threads/:board - List the most recently bumped threads.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    BoardPath(board): BoardPath,
) -> Result<Json<Vec<ThreadListResponse>>, ApiError> {
    let threads = {
        let mut conn = state.connection().await?;
        ThreadRepository::new(&mut conn)
            .list_recent(&board, THREAD_LIST_LIMIT, REPLY_PREVIEW_LIMIT)
            .await
            .map_err(|e| {
                tracing::error!(board = %board, "Failed to list threads: {}", e);
                ApiError::store(&e, format!("Error fetching threads from board {}", board))
            })?
    };

    Ok(Json(
        threads.into_iter().map(ThreadListResponse::from).collect(),
    ))
}

/// PUT /api/threads/:board - Report a thread.
pub async fn report_thread(
    State(state): State<Arc<AppState>>,
    BoardPath(board): BoardPath,
    BoardForm(req): BoardForm<ReportThreadRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Some(raw_id) = present(&req.thread_id) else {
        return Err(ApiError::bad_request(
            "A valid thread_id is required to report it.",
        ));
    };
    let thread_id = identity(raw_id, format!("Thread id: {} is invalid.", raw_id))?;

    let reported = {
        let mut conn = state.connection().await?;
        ThreadRepository::new(&mut conn)
            .report(&board, thread_id)
            .await
            .map_err(|e| {
                tracing::error!(board = %board, thread_id = %thread_id, "Failed to report thread: {}", e);
                ApiError::store(&e, format!("Error reporting thread with id: {}.", raw_id))
            })?
    };

    if !reported {
        return Err(ApiError::not_found(format!(
            "Thread with id: {} is not found.",
            raw_id
        )));
    }

    tracing::info!(board = %board, thread_id = %thread_id, "Thread reported");
    Ok((StatusCode::CREATED, Json(MessageResponse::success())))
}

/// DELETE /api/threads/:board - Delete a thread with its password.
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    BoardPath(board): BoardPath,
    BoardForm(req): BoardForm<DeleteThreadRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (Some(raw_id), Some(password)) = (present(&req.thread_id), present(&req.delete_password))
    else {
        return Err(ApiError::bad_request(
            "To delete a thread delete_password and thread_id should be present.",
        ));
    };
    let thread_id = identity(raw_id, "Thread id is invalid.")?;

    let mut conn = state.connection().await?;

    let thread = ThreadRepository::new(&mut conn)
        .get_by_id(&board, thread_id)
        .await
        .map_err(|e| {
            tracing::error!(board = %board, thread_id = %thread_id, "Failed to get thread: {}", e);
            ApiError::store(&e, "Service Unavailable")
        })?
        .ok_or_else(|| ApiError::not_found(format!("No thread with id: {} found", raw_id)))?;

    if let Err(e) = state.check_password(password, &thread.delete_password).await {
        tracing::warn!(board = %board, thread_id = %thread_id, "Thread delete password mismatch");
        return Err(e);
    }

    let deleted = ThreadRepository::new(&mut conn)
        .delete(&board, thread_id)
        .await
        .map_err(|e| {
            tracing::error!(board = %board, thread_id = %thread_id, "Failed to delete thread: {}", e);
            ApiError::store(&e, format!("Error deleting thread with id: {}.", raw_id))
        })?;

    // Deleted concurrently between lookup and delete
    if !deleted {
        return Err(ApiError::not_found(format!(
            "No thread with id: {} found",
            raw_id
        )));
    }

    tracing::info!(board = %board, thread_id = %thread_id, "Thread deleted");
    Ok(Json(MessageResponse::success()))
}
