//! Database schema migrations.
//!
//! Applies the initial schema: faqs, popular_questions, suggested_faqs, and
//! the schema_migrations bookkeeping table.

use rusqlite::Connection;
use tracing::info;

use askebl_core::error::AskEblError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), AskEblError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| AskEblError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| AskEblError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: knowledge_store");
    }

    Ok(())
}

/// Version 1: knowledge store.
fn apply_v1(conn: &Connection) -> Result<(), AskEblError> {
    conn.execute_batch(
        "
        -- Curated FAQ entries. keywords is a JSON array or NULL.
        CREATE TABLE IF NOT EXISTS faqs (
            id          TEXT PRIMARY KEY NOT NULL,
            question    TEXT NOT NULL,
            answer      TEXT NOT NULL,
            keywords    TEXT,
            category    TEXT,
            created_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_faqs_created_at
            ON faqs (created_at ASC);

        -- Quick questions shown above the chat, also matched as knowledge.
        CREATE TABLE IF NOT EXISTS popular_questions (
            id             TEXT PRIMARY KEY NOT NULL,
            question       TEXT NOT NULL,
            answer         TEXT NOT NULL,
            keywords       TEXT,
            category       TEXT,
            display_order  INTEGER NOT NULL DEFAULT 0,
            is_active      INTEGER NOT NULL DEFAULT 1
                           CHECK (is_active IN (0, 1))
        );

        CREATE INDEX IF NOT EXISTS idx_popular_questions_order
            ON popular_questions (is_active, display_order ASC);

        -- Unanswered questions users agreed to forward to the admin team.
        CREATE TABLE IF NOT EXISTS suggested_faqs (
            id                    TEXT PRIMARY KEY NOT NULL,
            question              TEXT NOT NULL,
            suggested_by_session  TEXT NOT NULL,
            created_at            INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_suggested_faqs_created_at
            ON suggested_faqs (created_at DESC);

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'knowledge_store');
        ",
    )
    .map_err(|e| AskEblError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
