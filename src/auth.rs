// src/auth.rs
//! Account credentials — salted PBKDF2 hashing, signup, login
//!
//! Stored hashes are self-describing:
//! `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`, so the iteration
//! count can be raised later without invalidating old accounts.

use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use sha2::Sha256;

use crate::consts::{PASSWORD_KDF_ITERATIONS, PASSWORD_SALT_LEN};
use crate::db::{Store, User};
use crate::error::{CloakError, Result};

const HASH_SCHEME: &str = "pbkdf2-sha256";
const HASH_LEN: usize = 32;

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; PASSWORD_SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let hash = pbkdf2_hmac_array::<Sha256, HASH_LEN>(
        password.as_bytes(),
        &salt,
        PASSWORD_KDF_ITERATIONS,
    );

    format!(
        "{HASH_SCHEME}${PASSWORD_KDF_ITERATIONS}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (scheme, iterations, salt_hex, hash_hex) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(s), Some(i), Some(salt), Some(hash), None) => (s, i, salt, hash),
        _ => return false,
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(hash_hex) else {
        return false;
    };

    let actual = pbkdf2_hmac_array::<Sha256, HASH_LEN>(password.as_bytes(), &salt, iterations);
    actual.as_slice() == expected.as_slice()
}

/// Shape check only — deliverability is the mailer's problem.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
}

/// Create an unverified account. Duplicate username or email is one
/// distinct error; which of the two collided is not disclosed.
pub fn signup(store: &Store, username: &str, email: &str, password: &str) -> Result<User> {
    if username.trim().is_empty() {
        return Err(CloakError::InvalidCredentials);
    }
    if !is_valid_email(email) {
        return Err(CloakError::InvalidEmail(email.to_string()));
    }
    store.create_user(username, email, &hash_password(password))
}

/// Authenticate. Unknown user and wrong password collapse into the same
/// error; a correct password on an unverified account is reported as such
/// so the caller can offer the verification flow.
pub fn login(store: &Store, username: &str, password: &str) -> Result<User> {
    let user = store
        .user_by_username(username)?
        .ok_or(CloakError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(CloakError::InvalidCredentials);
    }
    if !user.is_verified {
        return Err(CloakError::EmailNotVerified);
    }
    Ok(user)
}
