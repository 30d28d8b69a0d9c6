//! Database schema and migrations for anonboard.
//!
//! Migrations are applied in order; `schema_version` records how many ran.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: threads and their embedded replies
    r#"
-- A board is only a namespace: the `board` column, no table of its own.
-- Timestamps are microseconds since the Unix epoch.
CREATE TABLE threads (
    id              BLOB PRIMARY KEY,
    board           TEXT NOT NULL,
    text            TEXT NOT NULL,
    created_on      INTEGER NOT NULL,
    bumped_on       INTEGER NOT NULL,
    reported        INTEGER NOT NULL DEFAULT 0,
    delete_password TEXT NOT NULL            -- Argon2 hash
);

CREATE INDEX idx_threads_board_bumped ON threads(board, bumped_on DESC);

CREATE TABLE replies (
    id              BLOB PRIMARY KEY,
    thread_id       BLOB NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
    position        INTEGER NOT NULL,        -- 0-based insertion order within the thread
    text            TEXT NOT NULL,
    created_on      INTEGER NOT NULL,
    reported        INTEGER NOT NULL DEFAULT 0,
    delete_password TEXT NOT NULL,           -- Argon2 hash
    UNIQUE (thread_id, position)
);
"#,
];
