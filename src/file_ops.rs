// src/file_ops.rs
//! Filesystem contract — whole-file reads, atomic writes, idempotent removal
//!
//! Writes go through a temp file in the destination directory followed by a
//! rename, so a crash mid-write never leaves a partial file under its final
//! name. `write_atomic_exclusive` additionally refuses to replace an
//! existing file (exclusive-create semantics for blob names).

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{CloakError, Result};

pub fn read_all(path: &Path) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

/// Write via temp-then-rename. Fails with `AlreadyExists` if the final
/// name is taken — callers pick a different name instead of clobbering.
pub fn write_atomic_exclusive(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        CloakError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no parent directory: {}", path.display()),
        ))
    })?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(path).map_err(|e| CloakError::Io(e.error))?;
    Ok(())
}

/// Remove a file, treating "already absent" as success.
pub fn remove_idempotent(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// First free restore target for `name` inside `dir`: `name.ext`,
/// then `name (1).ext`, `name (2).ext`, …  Never overwrites.
pub fn unique_restore_path(dir: &Path, name: &str) -> PathBuf {
    let direct = dir.join(name);
    if !direct.exists() {
        return direct;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, Some(e)),
        _ => (name, None),
    };

    for n in 1u32.. {
        let candidate = match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        };
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("u32 range exhausted probing restore paths")
}
