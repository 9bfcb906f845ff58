//! File-backed token persistence for the CLI, the desktop stand-in for
//! the storefront's local storage.

use std::fs;
use std::path::PathBuf;

use bcod_client::TokenStore;

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn set(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                tracing::warn!(%error, path = %parent.display(), "cannot create token directory");
                return;
            }
        }
        if let Err(error) = fs::write(&self.path, token) {
            tracing::warn!(%error, path = %self.path.display(), "cannot persist token");
        }
    }

    fn clear(&self) {
        if self.path.exists() {
            if let Err(error) = fs::remove_file(&self.path) {
                tracing::warn!(%error, path = %self.path.display(), "cannot remove token file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bcod-token-test-{name}-{}", std::process::id()))
    }

    #[test]
    fn set_get_clear_round_trip() {
        let store = FileTokenStore::new(temp_path("round-trip"));
        store.clear();
        assert!(store.get().is_none());

        store.set("abc123");
        assert_eq!(store.get().as_deref(), Some("abc123"));

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn whitespace_only_file_reads_as_no_token() {
        let path = temp_path("whitespace");
        fs::write(&path, "  \n").expect("write test file");
        let store = FileTokenStore::new(path.clone());
        assert!(store.get().is_none());
        let _ = fs::remove_file(path);
    }
}
