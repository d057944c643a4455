// src/crypto.rs
//! Blob encryption — ChaCha20-Poly1305 under one process-wide key
//!
//! Envelope layout: `magic(4) || version(1) || nonce(12) || ciphertext+tag`.
//! A fresh random nonce per call means encrypting the same plaintext twice
//! yields different ciphertext. Decryption distinguishes a malformed
//! envelope (`Format`) from an authentication failure (`Integrity`).

use std::fmt;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::consts::{
    ENVELOPE_MAGIC, ENVELOPE_OVERHEAD, ENVELOPE_VERSION, KEY_DERIVE_CONTEXT, KEY_SIZE, NONCE_SIZE,
};
use crate::error::{CloakError, Result};

/// One symmetric key wrapped into encrypt/decrypt over byte buffers.
///
/// The key is derived exactly once at construction and is wiped on drop.
/// Rotation is out of scope — one key per process lifetime.
pub struct CipherEngine {
    key: Zeroizing<[u8; KEY_SIZE]>,
}

impl CipherEngine {
    /// Derive the blob key from the configured secret.
    ///
    /// `blake3::derive_key` with a fixed context is the documented
    /// encoding step between config string and key material.
    pub fn from_secret(secret: &str) -> Self {
        let key = blake3::derive_key(KEY_DERIVE_CONTEXT, secret.as_bytes());
        CipherEngine {
            key: Zeroizing::new(key),
        }
    }

    /// Use raw key material directly (test vectors, pre-derived keys).
    pub fn from_key(key: [u8; KEY_SIZE]) -> Self {
        CipherEngine {
            key: Zeroizing::new(key),
        }
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&*self.key));

        let mut nonce = [0u8; NONCE_SIZE];
        rand::rng().fill_bytes(&mut nonce);

        let body = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CloakError::Crypto)?;

        let mut out = Vec::with_capacity(ENVELOPE_OVERHEAD + plaintext.len());
        out.extend_from_slice(ENVELOPE_MAGIC);
        out.push(ENVELOPE_VERSION);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&body);
        Ok(out)
    }

    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() < ENVELOPE_OVERHEAD || !is_envelope(data) {
            return Err(CloakError::Format);
        }
        if data[ENVELOPE_MAGIC.len()] != ENVELOPE_VERSION {
            return Err(CloakError::Format);
        }

        let nonce_start = ENVELOPE_MAGIC.len() + 1;
        let nonce = &data[nonce_start..nonce_start + NONCE_SIZE];
        let body = &data[nonce_start + NONCE_SIZE..];

        let cipher = ChaCha20Poly1305::new(Key::from_slice(&*self.key));
        cipher
            .decrypt(Nonce::from_slice(nonce), body)
            .map_err(|_| CloakError::Integrity)
    }
}

// The key must never leak through logs or debug output
impl fmt::Debug for CipherEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherEngine").finish_non_exhaustive()
    }
}

/// Check whether data starts with the concealed-blob magic
pub fn is_envelope(data: &[u8]) -> bool {
    data.get(..ENVELOPE_MAGIC.len()) == Some(ENVELOPE_MAGIC.as_slice())
}

pub fn envelope_version(data: &[u8]) -> Option<u8> {
    if is_envelope(data) {
        data.get(ENVELOPE_MAGIC.len()).copied()
    } else {
        None
    }
}

pub fn blake3_hex(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
