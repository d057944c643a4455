// src/consts.rs
//! Shared constants — security parameters and defaults

/// Magic prefix of the concealed-blob envelope
pub const ENVELOPE_MAGIC: &[u8; 4] = b"FCLK";

/// Current envelope version
pub const ENVELOPE_VERSION: u8 = 1;

/// ChaCha20-Poly1305 nonce size in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Blob encryption key size in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// Bytes an envelope adds on top of the plaintext length
pub const ENVELOPE_OVERHEAD: usize = ENVELOPE_MAGIC.len() + 1 + NONCE_SIZE + TAG_SIZE;

/// Domain-separation context for deriving the blob key from the configured secret.
/// Changing this string invalidates every existing blob.
pub const KEY_DERIVE_CONTEXT: &str = "file-cloak 2025-07 blob encryption key v1";

/// Random bytes in a storage identifier (hex-encoded to twice this many chars)
pub const STORAGE_ID_BYTES: usize = 16;

/// PBKDF2-HMAC-SHA256 iterations for account passwords
// ~0.1–0.2s on modern hardware — good default
pub const PASSWORD_KDF_ITERATIONS: u32 = 256_000;

/// Salt length in bytes for account-password hashing
pub const PASSWORD_SALT_LEN: usize = 16;

/// Verification codes expire after this many seconds
pub const VERIFICATION_CODE_TTL_SECS: i64 = 600;

/// How long a metadata-store call may wait on a locked database
pub const DB_BUSY_TIMEOUT_MS: u32 = 5_000;
