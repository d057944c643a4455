// src/hider.rs
//! Hide/unhide lifecycle — the beating heart of file-cloak
//!
//! One `FileHider` per authenticated session: a fixed owner id, the open
//! root where restored files land, and the concealed root where blobs
//! live. Whole files are processed in memory; streaming very large files
//! is a known scaling limitation.

use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::warn;

use crate::consts::STORAGE_ID_BYTES;
use crate::crypto::{blake3_hex, CipherEngine};
use crate::db::{HiddenFileRecord, Store};
use crate::error::{CloakError, Result};
use crate::file_ops;

pub struct FileHider<'a> {
    owner_id: i64,
    open_root: PathBuf,
    concealed_root: PathBuf,
    store: &'a Store,
    cipher: &'a CipherEngine,
}

/// Fresh unguessable blob name, never derived from user input.
pub fn new_storage_id() -> String {
    let mut bytes = [0u8; STORAGE_ID_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl<'a> FileHider<'a> {
    pub fn new(
        owner_id: i64,
        open_root: impl Into<PathBuf>,
        concealed_root: impl Into<PathBuf>,
        store: &'a Store,
        cipher: &'a CipherEngine,
    ) -> Self {
        FileHider {
            owner_id,
            open_root: open_root.into(),
            concealed_root: concealed_root.into(),
            store,
            cipher,
        }
    }

    /// Conceal `source`: encrypt it into the concealed root, record the
    /// metadata, then delete the original. Returns the storage identifier.
    ///
    /// Ordering invariant: the source is deleted only after both the blob
    /// write and the metadata commit succeed. Any earlier failure rolls
    /// back fully — no orphaned blob, no dangling record, source intact.
    pub fn hide(&self, source: &Path) -> Result<String> {
        match std::fs::metadata(source) {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(CloakError::SourceNotFound(source.to_path_buf())),
        }
        let original_filename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CloakError::SourceNotFound(source.to_path_buf()))?;

        let plaintext = file_ops::read_all(source)?;

        let storage_id = new_storage_id();
        let ciphertext = self.cipher.encrypt(&plaintext)?;
        let content_hash = blake3_hex(&ciphertext);

        // Exclusive create: a reused identifier must fail, not overwrite
        let blob_path = self.concealed_root.join(&storage_id);
        file_ops::write_atomic_exclusive(&blob_path, &ciphertext)?;

        if let Err(e) = self.store.insert_hidden_file(
            self.owner_id,
            &original_filename,
            &storage_id,
            &blob_path,
            &content_hash,
        ) {
            // Metadata commit failed — take the blob back out
            if let Err(rm) = file_ops::remove_idempotent(&blob_path) {
                warn!(blob = %blob_path.display(), error = %rm, "rollback could not remove blob");
            }
            return Err(e);
        }

        std::fs::remove_file(source)?;
        Ok(storage_id)
    }

    /// Restore the hidden file behind `record_id` into the open root and
    /// retire its record and blob. Returns the restored path.
    pub fn unhide(&self, record_id: i64) -> Result<PathBuf> {
        let record = self
            .store
            .hidden_file(record_id, self.owner_id)?
            .ok_or(CloakError::RecordNotFound)?;

        let ciphertext = match file_ops::read_all(&record.blob_path) {
            Ok(data) => data,
            Err(CloakError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CloakError::BlobMissing(record_id))
            }
            Err(e) => return Err(e),
        };

        // Stored checksum catches on-disk corruption before the AEAD does
        if blake3_hex(&ciphertext) != record.content_hash {
            return Err(CloakError::Integrity);
        }
        let plaintext = self.cipher.decrypt(&ciphertext)?;

        // Never overwrite whatever already lives at the restore path;
        // retry on a lost race for the same free name
        let restored = loop {
            let candidate = file_ops::unique_restore_path(&self.open_root, &record.original_filename);
            match file_ops::write_atomic_exclusive(&candidate, &plaintext) {
                Ok(()) => break candidate,
                Err(CloakError::Io(e)) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        };

        // The record delete is the atomic claim between concurrent unhides
        match self.store.delete_hidden_file(record_id, self.owner_id) {
            Ok(true) => {}
            Ok(false) => {
                // Another session already unhid this record — withdraw our copy
                if let Err(e) = file_ops::remove_idempotent(&restored) {
                    warn!(path = %restored.display(), error = %e, "could not remove duplicate restore");
                }
                return Err(CloakError::RecordNotFound);
            }
            Err(e) => {
                // Restored copy exists but the record lingers. Recoverable:
                // the stale entry can be purged by hand, nothing was lost.
                warn!(
                    record_id,
                    error = %e,
                    "file restored but record removal failed — stale hidden-file entry remains"
                );
                return Ok(restored);
            }
        }

        if let Err(e) = file_ops::remove_idempotent(&record.blob_path) {
            warn!(
                blob = %record.blob_path.display(),
                error = %e,
                "file restored but blob removal failed — orphaned blob remains"
            );
        }

        Ok(restored)
    }

    /// One-shot snapshot of this owner's records, insertion order.
    pub fn list(&self) -> Result<Vec<HiddenFileRecord>> {
        self.store.list_hidden_files(self.owner_id)
    }
}
