// src/verify.rs
//! Email verification — time-limited one-time codes
//!
//! Code transport is behind the narrow `CodeSender` seam; SMTP, or
//! anything else that can carry six digits, lives outside this crate.
//! A code and its issuance timestamp are written and cleared together,
//! so an unverified user has either exactly one outstanding code or none.

use chrono::Utc;
use rand::Rng;

use crate::consts::VERIFICATION_CODE_TTL_SECS;
use crate::db::Store;
use crate::error::{CloakError, Result};

/// Delivery seam for verification codes.
pub trait CodeSender {
    fn send_code(&self, email: &str, username: &str, code: &str) -> Result<()>;
}

/// Prints the code to stdout — dev and single-machine use.
pub struct ConsoleSender;

impl CodeSender for ConsoleSender {
    fn send_code(&self, email: &str, username: &str, code: &str) -> Result<()> {
        println!("[verification] {username} <{email}>: your code is {code}");
        Ok(())
    }
}

pub fn generate_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000u32))
}

/// Issue (or re-issue) a code for an unverified account and hand it to the
/// sender. Any previously outstanding code is replaced.
pub fn issue(store: &Store, sender: &dyn CodeSender, email: &str) -> Result<()> {
    let user = store.user_by_email(email)?.ok_or(CloakError::UserNotFound)?;
    if user.is_verified {
        return Err(CloakError::AlreadyVerified);
    }

    let code = generate_code();
    store.set_verification_code(user.id, &code, Utc::now().timestamp())?;
    sender.send_code(&user.email, &user.username, &code)
}

/// Validate a submitted code: must match the outstanding one and be
/// younger than the TTL. Success flips the verified flag and clears the
/// code in one statement.
pub fn confirm(store: &Store, email: &str, code: &str) -> Result<()> {
    let user = store.user_by_email(email)?.ok_or(CloakError::UserNotFound)?;
    if user.is_verified {
        return Err(CloakError::AlreadyVerified);
    }

    let (outstanding, issued_at) = match (user.verification_code, user.code_issued_at) {
        (Some(c), Some(t)) => (c, t),
        _ => return Err(CloakError::NoCodeIssued),
    };

    if outstanding != code {
        return Err(CloakError::CodeMismatch);
    }
    if Utc::now().timestamp() - issued_at > VERIFICATION_CODE_TTL_SECS {
        return Err(CloakError::CodeExpired);
    }

    store.mark_verified(user.id)
}
