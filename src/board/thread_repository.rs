//! Thread repository for anonboard.
//!
//! Every query is scoped by board: a thread ID looked up under another board
//! does not exist.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite};

use super::reply::{Reply, ReplyRow};
use super::reply_repository::ReplyRepository;
use super::thread::{NewThread, Thread, ThreadPreview, ThreadRow};
use super::types::{new_id, now, BoardName, ThreadId};
use crate::db::DbConnection;
use crate::Result;

/// Thread row plus its total reply count.
#[derive(Debug, sqlx::FromRow)]
struct ThreadPreviewRow {
    #[sqlx(flatten)]
    thread: ThreadRow,
    reply_count: i64,
}

/// Repository for thread operations on a checked-out connection.
pub struct ThreadRepository<'c> {
    conn: &'c mut DbConnection,
}

impl<'c> ThreadRepository<'c> {
    /// Create a new ThreadRepository over the given connection.
    pub fn new(conn: &'c mut DbConnection) -> Self {
        Self { conn }
    }

    /// Create a new thread on a board.
    ///
    /// The board springs into existence with its first thread.
    pub async fn create(&mut self, board: &BoardName, new_thread: &NewThread) -> Result<Thread> {
        let id = new_id();
        let created_on = now();
        let micros = created_on.timestamp_micros();

        sqlx::query(
            "INSERT INTO threads (id, board, text, created_on, bumped_on, reported, delete_password)
             VALUES ($1, $2, $3, $4, $4, 0, $5)",
        )
        .bind(id)
        .bind(board.as_str())
        .bind(&new_thread.text)
        .bind(micros)
        .bind(&new_thread.delete_password)
        .execute(&mut *self.conn)
        .await?;

        Ok(Thread {
            id,
            board: board.as_str().to_string(),
            text: new_thread.text.clone(),
            created_on,
            bumped_on: created_on,
            reported: false,
            delete_password: new_thread.delete_password.clone(),
            replies: Vec::new(),
        })
    }

    /// Get a thread with all of its replies.
    pub async fn get_by_id(&mut self, board: &BoardName, id: ThreadId) -> Result<Option<Thread>> {
        let row = sqlx::query_as::<_, ThreadRow>(
            "SELECT id, board, text, created_on, bumped_on, reported, delete_password
             FROM threads WHERE id = $1 AND board = $2",
        )
        .bind(id)
        .bind(board.as_str())
        .fetch_optional(&mut *self.conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let replies = ReplyRepository::new(&mut *self.conn)
            .list_by_thread(id)
            .await?;
        Ok(Some(row.into_thread(replies)))
    }

    /// List the most recently bumped threads of a board.
    ///
    /// Each thread embeds at most `reply_limit` of its latest replies, oldest
    /// first; the full count is reported alongside.
    pub async fn list_recent(
        &mut self,
        board: &BoardName,
        limit: i64,
        reply_limit: i64,
    ) -> Result<Vec<ThreadPreview>> {
        let rows = sqlx::query_as::<_, ThreadPreviewRow>(
            "SELECT t.id, t.board, t.text, t.created_on, t.bumped_on, t.reported, t.delete_password,
                    (SELECT COUNT(*) FROM replies r WHERE r.thread_id = t.id) AS reply_count
             FROM threads t
             WHERE t.board = $1
             ORDER BY t.bumped_on DESC, t.rowid DESC
             LIMIT $2",
        )
        .bind(board.as_str())
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;

        let ids: Vec<ThreadId> = rows.iter().map(|r| r.thread.id).collect();
        let mut replies = self.latest_replies(&ids, reply_limit).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let thread_replies = replies.remove(&row.thread.id).unwrap_or_default();
                ThreadPreview {
                    thread: row.thread.into_thread(thread_replies),
                    reply_count: row.reply_count,
                }
            })
            .collect())
    }

    /// Fetch the latest `per_thread` replies of each thread, grouped by thread
    /// and in insertion order.
    async fn latest_replies(
        &mut self,
        thread_ids: &[ThreadId],
        per_thread: i64,
    ) -> Result<HashMap<ThreadId, Vec<Reply>>> {
        let mut grouped: HashMap<ThreadId, Vec<Reply>> = HashMap::new();
        if thread_ids.is_empty() || per_thread <= 0 {
            return Ok(grouped);
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, thread_id, text, created_on, reported, delete_password FROM (
                SELECT r.*, ROW_NUMBER() OVER (
                    PARTITION BY r.thread_id ORDER BY r.position DESC
                ) AS recency
                FROM replies r WHERE r.thread_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in thread_ids {
            separated.push_bind(*id);
        }
        query.push(")) WHERE recency <= ");
        query.push_bind(per_thread);
        query.push(" ORDER BY thread_id, position");

        let rows = query
            .build_query_as::<ReplyRow>()
            .fetch_all(&mut *self.conn)
            .await?;

        for row in rows {
            grouped.entry(row.thread_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    /// Mark a thread as reported.
    ///
    /// Returns false if the thread does not exist on the board. Reporting an
    /// already reported thread still counts as a match.
    pub async fn report(&mut self, board: &BoardName, id: ThreadId) -> Result<bool> {
        let result = sqlx::query("UPDATE threads SET reported = 1 WHERE id = $1 AND board = $2")
            .bind(id)
            .bind(board.as_str())
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a thread. Its replies are removed by the foreign key cascade.
    ///
    /// Returns true if a thread was deleted, false if not found.
    pub async fn delete(&mut self, board: &BoardName, id: ThreadId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1 AND board = $2")
            .bind(id)
            .bind(board.as_str())
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
