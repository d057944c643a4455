// src/config.rs
//! Configuration — TOML file + `FCLK_*` env overrides
//!
//! `load` returns an owned value the caller passes around explicitly;
//! nothing here is a process-wide singleton. Both directory roots are
//! validated once at startup via [`Config::ensure_roots`], not per call.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CloakError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keys: Keys,
    pub paths: Paths,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Keys {
    /// Secret the blob key is derived from. Never logged, never stored.
    pub cipher_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Where restored plaintext files land
    pub open_root: PathBuf,
    /// Where concealed ciphertext blobs live
    pub concealed_root: PathBuf,
    /// SQLite metadata store
    pub db_path: PathBuf,
}

impl Default for Keys {
    fn default() -> Self {
        Keys {
            cipher_secret: "dev-cloak-secret-2025".into(),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("file-cloak");
        Paths {
            open_root: base.join("restored"),
            concealed_root: base.join("concealed"),
            db_path: base.join("cloak.db"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keys: Keys::default(),
            paths: Paths::default(),
        }
    }
}

impl Config {
    /// Load from `FCLK_CONFIG` (default `cloak.toml`), then apply env overrides.
    pub fn load() -> Result<Config> {
        let config_path =
            std::env::var("FCLK_CONFIG").unwrap_or_else(|_| "cloak.toml".to_string());

        let mut conf: Config = if Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)
                .map_err(|e| CloakError::Config(format!("{config_path}: {e}")))?
        } else {
            Config::default()
        };

        // Env overrides win over the file — same knobs, per-invocation scope
        if let Ok(v) = std::env::var("FCLK_CIPHER_SECRET") {
            conf.keys.cipher_secret = v;
        }
        if let Ok(v) = std::env::var("FCLK_OPEN_ROOT") {
            conf.paths.open_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("FCLK_CONCEALED_ROOT") {
            conf.paths.concealed_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("FCLK_DB_PATH") {
            conf.paths.db_path = PathBuf::from(v);
        }

        if conf.keys.cipher_secret == Keys::default().cipher_secret {
            tracing::warn!("using built-in dev cipher secret — set FCLK_CIPHER_SECRET");
        }

        Ok(conf)
    }

    /// Create both roots if missing and probe that they are writable.
    pub fn ensure_roots(&self) -> Result<()> {
        for root in [&self.paths.open_root, &self.paths.concealed_root] {
            std::fs::create_dir_all(root)?;
            // Writability probe: an anonymous temp file, gone on drop
            tempfile::tempfile_in(root).map_err(|e| {
                CloakError::Config(format!("root {} is not writable: {e}", root.display()))
            })?;
        }
        Ok(())
    }
}
