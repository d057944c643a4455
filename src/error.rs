// src/error.rs
//! Public error type for the entire crate
//!
//! One typed enum instead of a generic failure message, so callers can
//! tell "file missing" from "decryption failed" from "store unavailable".
//! `RecordNotFound` deliberately covers both a nonexistent record and a
//! record owned by someone else — the caller must not be able to probe
//! for other users' records.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloakError {
    #[error("source file not found or not a regular file: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("hidden file not found")]
    RecordNotFound,

    #[error("concealed blob missing for record {0}")]
    BlobMissing(i64),

    #[error("ciphertext rejected: integrity check failed")]
    Integrity,

    #[error("unrecognized ciphertext envelope")]
    Format,

    #[error("cryptographic operation failed")]
    Crypto,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("email address not verified")]
    EmailNotVerified,

    #[error("username or email already registered")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("account is already verified")]
    AlreadyVerified,

    #[error("no verification code outstanding")]
    NoCodeIssued,

    #[error("verification code does not match")]
    CodeMismatch,

    #[error("verification code expired")]
    CodeExpired,

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, CloakError>;
