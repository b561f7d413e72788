//! Durable bearer-token storage.
//!
//! The portal issues one opaque session token per login; this store
//! persists it across process restarts. Key properties:
//! - One token value at a fixed, app-specific path
//! - No local validation; only the server can judge a token
//! - `clear` is idempotent; a missing file reads as "no session"

use std::io;
use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════
// SessionStore
// ═══════════════════════════════════════════════════════════

/// File-backed store for the current session token.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default application path (`~/MediPort/session.token`).
    pub fn open_default() -> Self {
        Self::at(crate::config::session_token_path())
    }

    /// Store at an explicit path. Used by tests and embedders.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist a bearer token, replacing any previous one.
    pub fn set_token(&self, token: &str) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        tracing::debug!("Session token persisted");
        Ok(())
    }

    /// The persisted token, or `None` when absent or empty.
    pub fn token(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(_) => None,
        }
    }

    /// Remove the persisted token. Safe to call when none exists.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::Io(e)),
        }
    }

    /// Whether a token is currently present.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from session store operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session storage error: {0}")]
    Io(#[from] io::Error),
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.token"));
        (dir, store)
    }

    #[test]
    fn fresh_store_has_no_token() {
        let (_dir, store) = temp_store();
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn set_then_get_round_trips() {
        let (_dir, store) = temp_store();
        store.set_token("abc.def.ghi").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc.def.ghi"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn set_replaces_previous_token() {
        let (_dir, store) = temp_store();
        store.set_token("first").unwrap();
        store.set_token("second").unwrap();
        assert_eq!(store.token().as_deref(), Some("second"));
    }

    #[test]
    fn token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.token");
        SessionStore::at(path.clone()).set_token("persisted").unwrap();

        let reopened = SessionStore::at(path);
        assert_eq!(reopened.token().as_deref(), Some("persisted"));
    }

    #[test]
    fn clear_removes_token() {
        let (_dir, store) = temp_store();
        store.set_token("abc").unwrap();
        store.clear().unwrap();
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn clear_without_token_is_ok() {
        let (_dir, store) = temp_store();
        assert!(store.clear().is_ok());
    }

    #[test]
    fn whitespace_only_file_reads_as_no_token() {
        let (_dir, store) = temp_store();
        store.set_token("  \n").unwrap();
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("nested/deep/session.token"));
        store.set_token("abc").unwrap();
        assert!(store.is_authenticated());
    }
}
