// tests/common.rs
//! Test utilities — throwaway roots, store, and cipher per test

use std::cell::RefCell;
use std::path::PathBuf;

use file_cloak::{CipherEngine, CodeSender, FileHider, Result, Store, User};
use tempfile::TempDir;

pub struct TestEnv {
    pub dir: TempDir,
    pub open_root: PathBuf,
    pub concealed_root: PathBuf,
    pub store: Store,
    pub cipher: CipherEngine,
}

#[allow(dead_code)] // Each integration-test binary uses its own subset
impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let open_root = dir.path().join("restored");
        let concealed_root = dir.path().join("concealed");
        std::fs::create_dir_all(&open_root).expect("create open root");
        std::fs::create_dir_all(&concealed_root).expect("create concealed root");

        let store = Store::open(&dir.path().join("cloak.db")).expect("open store");
        let cipher = CipherEngine::from_secret("test-cloak-secret");

        Self {
            dir,
            open_root,
            concealed_root,
            store,
            cipher,
        }
    }

    /// Verified account without the signup KDF — hider tests don't need
    /// real password hashes.
    pub fn user(&self, name: &str) -> User {
        let email = format!("{name}@example.com");
        let user = self
            .store
            .create_user(name, &email, "unused-hash")
            .expect("create user");
        self.store.mark_verified(user.id).expect("mark verified");
        self.store
            .user_by_username(name)
            .expect("lookup user")
            .expect("user exists")
    }

    pub fn hider_for<'a>(&'a self, user: &User) -> FileHider<'a> {
        FileHider::new(
            user.id,
            &self.open_root,
            &self.concealed_root,
            &self.store,
            &self.cipher,
        )
    }

    /// Drop a plaintext source file outside both roots.
    pub fn write_source(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write source");
        path
    }
}

/// Captures issued codes instead of delivering them.
pub struct RecordingSender {
    pub codes: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingSender {
    pub fn new() -> Self {
        Self {
            codes: RefCell::new(Vec::new()),
        }
    }

    pub fn last_code(&self) -> String {
        self.codes.borrow().last().expect("a code was sent").clone()
    }
}

impl CodeSender for RecordingSender {
    fn send_code(&self, _email: &str, _username: &str, code: &str) -> Result<()> {
        self.codes.borrow_mut().push(code.to_string());
        Ok(())
    }
}
