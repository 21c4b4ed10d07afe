//! The SQLite file behind the knowledge store.
//!
//! FAQs, popular questions and suggested questions share one connection,
//! so a suggestion written mid-chat is visible to the admin subcommands.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::{debug, info};

use askebl_core::error::AskEblError;

use crate::migrations;

/// Knowledge store handle. Repositories hold it behind an `Arc`.
pub struct Database {
    conn: Mutex<Connection>,
}

fn store_error(what: &str, e: rusqlite::Error) -> AskEblError {
    AskEblError::Storage(format!("{what}: {e}"))
}

impl Database {
    /// Open the knowledge store file, creating it and its directory on first run.
    pub fn new(path: &Path) -> Result<Self, AskEblError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| store_error("Cannot open knowledge store", e))?;
        // WAL lets `askebl suggestions` read while a chat session is writing.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 2000;",
        )
        .map_err(|e| store_error("Cannot configure knowledge store", e))?;

        let store = Self::prepare(conn)?;
        info!(path = %path.display(), "Knowledge store ready");
        Ok(store)
    }

    /// A throwaway store for tests.
    pub fn in_memory() -> Result<Self, AskEblError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| store_error("Cannot open in-memory knowledge store", e))?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, AskEblError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(migrations::run_migrations)?;
        debug!("Knowledge store schema is current");
        Ok(store)
    }

    /// Run `f` against the connection. Calls are serialised.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, AskEblError>
    where
        F: FnOnce(&Connection) -> Result<T, AskEblError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AskEblError::Storage("Knowledge store lock poisoned".to_string()))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
