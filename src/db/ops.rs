// src/db/ops.rs
//! Record operations on the metadata store
//!
//! Every mutation here is a single statement, so each commits atomically.
//! `delete_hidden_file` reports whether a row was actually removed — that
//! changed-row count is the claim that serializes concurrent unhides.

use std::path::{Path, PathBuf};

use rusqlite::params;

use super::Store;
use crate::error::{CloakError, Result};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub verification_code: Option<String>,
    pub code_issued_at: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct HiddenFileRecord {
    pub id: i64,
    pub user_id: i64,
    /// Display name only — never a path
    pub original_filename: String,
    pub storage_id: String,
    pub blob_path: PathBuf,
    /// BLAKE3 hex of the ciphertext blob
    pub content_hash: String,
    pub hidden_at: String,
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, is_verified, verification_code, code_issued_at";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        is_verified: row.get::<_, i64>(4)? != 0,
        verification_code: row.get(5)?,
        code_issued_at: row.get(6)?,
    })
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<HiddenFileRecord> {
    Ok(HiddenFileRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        original_filename: row.get(2)?,
        storage_id: row.get(3)?,
        blob_path: PathBuf::from(row.get::<_, String>(4)?),
        content_hash: row.get(5)?,
        hidden_at: row.get(6)?,
    })
}

impl Store {
    // ── users ────────────────────────────────────────────────

    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let inserted = self.conn.execute(
            "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
            params![username, email, password_hash],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(CloakError::UserExists)
            }
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();
        Ok(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_verified: false,
            verification_code: None,
            code_issued_at: None,
        })
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_by("username", username)
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_by("email", email)
    }

    fn user_by(&self, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
        match self.conn.query_row(&sql, [value], row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set an outstanding code. Code and timestamp move in one statement,
    /// replacing any previous pair.
    pub fn set_verification_code(&self, user_id: i64, code: &str, issued_at: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET verification_code = ?2, code_issued_at = ?3 WHERE id = ?1",
            params![user_id, code, issued_at],
        )?;
        Ok(())
    }

    /// Flip the verified flag and clear the code pair, atomically.
    pub fn mark_verified(&self, user_id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET is_verified = 1, verification_code = NULL, code_issued_at = NULL
             WHERE id = ?1",
            params![user_id],
        )?;
        Ok(())
    }

    // ── hidden files ─────────────────────────────────────────

    pub fn insert_hidden_file(
        &self,
        user_id: i64,
        original_filename: &str,
        storage_id: &str,
        blob_path: &Path,
        content_hash: &str,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO hidden_files (user_id, original_filename, storage_id, blob_path, content_hash)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                original_filename,
                storage_id,
                blob_path.to_string_lossy().into_owned(),
                content_hash,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Lookup scoped to the owner. A foreign record and a nonexistent one
    /// are indistinguishable here on purpose.
    pub fn hidden_file(&self, id: i64, owner_id: i64) -> Result<Option<HiddenFileRecord>> {
        let result = self.conn.query_row(
            "SELECT id, user_id, original_filename, storage_id, blob_path, content_hash, hidden_at
             FROM hidden_files WHERE id = ?1 AND user_id = ?2",
            params![id, owner_id],
            row_to_record,
        );
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// One-shot snapshot in insertion order.
    pub fn list_hidden_files(&self, owner_id: i64) -> Result<Vec<HiddenFileRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, original_filename, storage_id, blob_path, content_hash, hidden_at
             FROM hidden_files WHERE user_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([owner_id], row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Returns `false` when no owned row matched — either it never existed
    /// or a concurrent unhide claimed it first.
    pub fn delete_hidden_file(&self, id: i64, owner_id: i64) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM hidden_files WHERE id = ?1 AND user_id = ?2",
            params![id, owner_id],
        )?;
        Ok(rows > 0)
    }
}
