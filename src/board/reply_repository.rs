//! Reply repository for anonboard.
//!
//! Replies live in their own table but are only ever addressed through their
//! parent thread, and that thread's board.

use sqlx::Connection;

use super::reply::{NewReply, Reply, ReplyRow, REDACTED_TEXT};
use super::types::{new_id, now, BoardName, ReplyId, ThreadId};
use crate::db::DbConnection;
use crate::Result;

/// Repository for reply operations on a checked-out connection.
pub struct ReplyRepository<'c> {
    conn: &'c mut DbConnection,
}

impl<'c> ReplyRepository<'c> {
    /// Create a new ReplyRepository over the given connection.
    pub fn new(conn: &'c mut DbConnection) -> Self {
        Self { conn }
    }

    /// Append a reply to a thread and bump the thread, atomically.
    ///
    /// Returns `None` if no thread with that ID exists on the board.
    pub async fn create(
        &mut self,
        board: &BoardName,
        thread_id: ThreadId,
        new_reply: &NewReply,
    ) -> Result<Option<Reply>> {
        let id = new_id();
        let created_on = now();
        let micros = created_on.timestamp_micros();

        let mut tx = self.conn.begin().await?;

        // The bump takes the write lock first, so concurrent appends to the
        // same thread serialize and positions stay dense. bumped_on never
        // moves backwards, even if a later commit carries an earlier clock.
        let bumped = sqlx::query(
            "UPDATE threads SET bumped_on = MAX(bumped_on, $1) WHERE id = $2 AND board = $3",
        )
        .bind(micros)
        .bind(thread_id)
        .bind(board.as_str())
        .execute(&mut *tx)
        .await?;

        if bumped.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO replies (id, thread_id, position, text, created_on, reported, delete_password)
             VALUES ($1, $2,
                     (SELECT COALESCE(MAX(position), -1) + 1 FROM replies WHERE thread_id = $2),
                     $3, $4, 0, $5)",
        )
        .bind(id)
        .bind(thread_id)
        .bind(&new_reply.text)
        .bind(micros)
        .bind(&new_reply.delete_password)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(Reply {
            id,
            thread_id,
            text: new_reply.text.clone(),
            created_on,
            reported: false,
            delete_password: new_reply.delete_password.clone(),
        }))
    }

    /// Get a reply by ID within a thread on a board.
    pub async fn get(
        &mut self,
        board: &BoardName,
        thread_id: ThreadId,
        reply_id: ReplyId,
    ) -> Result<Option<Reply>> {
        let row = sqlx::query_as::<_, ReplyRow>(
            "SELECT r.id, r.thread_id, r.text, r.created_on, r.reported, r.delete_password
             FROM replies r JOIN threads t ON t.id = r.thread_id
             WHERE r.id = $1 AND r.thread_id = $2 AND t.board = $3",
        )
        .bind(reply_id)
        .bind(thread_id)
        .bind(board.as_str())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Reply::from))
    }

    /// List all replies of a thread in insertion order.
    pub async fn list_by_thread(&mut self, thread_id: ThreadId) -> Result<Vec<Reply>> {
        let rows = sqlx::query_as::<_, ReplyRow>(
            "SELECT id, thread_id, text, created_on, reported, delete_password
             FROM replies WHERE thread_id = $1 ORDER BY position",
        )
        .bind(thread_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Reply::from).collect())
    }

    /// Mark a reply as reported.
    ///
    /// Returns false if the thread/reply pair does not exist on the board.
    /// Reporting an already reported reply still counts as a match.
    pub async fn report(
        &mut self,
        board: &BoardName,
        thread_id: ThreadId,
        reply_id: ReplyId,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE replies SET reported = 1
             WHERE id = $1 AND thread_id = $2
               AND EXISTS (SELECT 1 FROM threads WHERE id = $2 AND board = $3)",
        )
        .bind(reply_id)
        .bind(thread_id)
        .bind(board.as_str())
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite a reply's text with the redaction placeholder.
    ///
    /// The reply keeps its identity and position. Returns false if the
    /// thread/reply pair does not exist on the board.
    pub async fn redact(
        &mut self,
        board: &BoardName,
        thread_id: ThreadId,
        reply_id: ReplyId,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE replies SET text = $4
             WHERE id = $1 AND thread_id = $2
               AND EXISTS (SELECT 1 FROM threads WHERE id = $2 AND board = $3)",
        )
        .bind(reply_id)
        .bind(thread_id)
        .bind(board.as_str())
        .bind(REDACTED_TEXT)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
