// src/db/conn.rs
use std::path::Path;

use rusqlite::Connection;

use crate::consts::DB_BUSY_TIMEOUT_MS;
use crate::error::Result;

/// Handle over the SQLite metadata store.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (creating if needed) the store at `db_path` and bootstrap the schema.
    pub fn open(db_path: &Path) -> Result<Store> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    /// In-memory store — tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Store> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Store> {
        conn.execute_batch(&format!(
            r#"
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = {DB_BUSY_TIMEOUT_MS};

            CREATE TABLE IF NOT EXISTS users (
                id                INTEGER PRIMARY KEY,
                username          TEXT NOT NULL UNIQUE,
                email             TEXT NOT NULL UNIQUE,
                password_hash     TEXT NOT NULL,
                is_verified       INTEGER NOT NULL DEFAULT 0,
                verification_code TEXT,
                code_issued_at    INTEGER,
                created_at        TEXT NOT NULL DEFAULT (datetime('now')),
                -- a code and its timestamp travel together
                CHECK ((verification_code IS NULL) = (code_issued_at IS NULL))
            );

            CREATE TABLE IF NOT EXISTS hidden_files (
                id                INTEGER PRIMARY KEY,
                user_id           INTEGER NOT NULL REFERENCES users(id),
                original_filename TEXT NOT NULL,
                storage_id        TEXT NOT NULL UNIQUE,
                blob_path         TEXT NOT NULL,
                content_hash      TEXT NOT NULL,
                hidden_at         TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_hidden_files_user ON hidden_files(user_id);
            "#
        ))?;
        Ok(Store { conn })
    }

    /// Direct connection access — escape hatch for maintenance queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Close the store explicitly, surfacing any flush error.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}
