use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker file name in the state directory
const MARKER_FILE: &str = "login_marker.json";

/// On-disk record that this client logged in successfully at some point.
///
/// The marker is a hint, not a credential: it only decides whether startup
/// probes the backend for a live session or goes straight to logged-out.
/// The session cookie itself lives in the HTTP cookie jar.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoginMarker {
    remembered_at: DateTime<Utc>,
}

pub struct MarkerStore {
    state_dir: PathBuf,
}

impl MarkerStore {
    pub fn new(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }

    /// Whether a previous login is remembered.
    pub fn is_set(&self) -> bool {
        self.marker_path().exists()
    }

    /// When the remembered login happened, if the marker is present and
    /// readable.
    pub fn remembered_at(&self) -> Option<DateTime<Utc>> {
        let contents = std::fs::read_to_string(self.marker_path()).ok()?;
        let marker: LoginMarker = serde_json::from_str(&contents).ok()?;
        Some(marker.remembered_at)
    }

    /// Record a successful login.
    pub fn set(&self) -> Result<()> {
        let marker = LoginMarker {
            remembered_at: Utc::now(),
        };
        let path = self.marker_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create state directory")?;
        }
        let contents = serde_json::to_string_pretty(&marker)?;
        std::fs::write(path, contents).context("Failed to write login marker")?;
        Ok(())
    }

    /// Forget the remembered login. Removing an already-absent marker is
    /// not an error.
    pub fn clear(&self) -> Result<()> {
        let path = self.marker_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove login marker")?;
        }
        Ok(())
    }

    fn marker_path(&self) -> PathBuf {
        self.state_dir.join(MARKER_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, MarkerStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MarkerStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_set_then_clear_round_trip() {
        let (_dir, store) = store();
        assert!(!store.is_set());

        store.set().expect("set marker");
        assert!(store.is_set());
        assert!(store.remembered_at().is_some());

        store.clear().expect("clear marker");
        assert!(!store.is_set());
        assert!(store.remembered_at().is_none());
    }

    #[test]
    fn test_clear_without_marker_is_ok() {
        let (_dir, store) = store();
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_unreadable_marker_still_counts_as_set() {
        let (dir, store) = store();
        std::fs::write(dir.path().join(MARKER_FILE), "not json").expect("write");
        assert!(store.is_set());
        assert!(store.remembered_at().is_none());
    }
}
