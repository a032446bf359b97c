//! Token storage file I/O.
//!
//! Reads and writes `~/.cradle/auth.json` with secure file permissions
//! (0o600). The file holds a single opaque bearer token; a missing or
//! corrupt file reads as logged-out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Default auth file name.
const AUTH_FILE_NAME: &str = "auth.json";

/// Current storage format version.
const STORAGE_VERSION: u32 = 1;

/// On-disk auth file shape.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAuth {
    version: u32,
    access_token: Option<String>,
    last_updated: Option<String>,
}

impl Default for StoredAuth {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            access_token: None,
            last_updated: None,
        }
    }
}

/// File-backed store for the single opaque bearer token.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store over the given file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default auth file path (`~/.cradle/auth.json`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home).join(".cradle").join(AUTH_FILE_NAME)
    }

    /// Path this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token.
    ///
    /// Returns `None` if the file is missing, unreadable, corrupt, or of an
    /// unsupported version — all of which read as logged-out.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("failed to read auth file: {e}");
                return None;
            }
        };

        match serde_json::from_str::<StoredAuth>(&data) {
            Ok(stored) if stored.version == STORAGE_VERSION => stored.access_token,
            Ok(stored) => {
                tracing::warn!("unsupported auth storage version: {}", stored.version);
                None
            }
            Err(e) => {
                tracing::warn!("failed to parse auth file: {e}");
                None
            }
        }
    }

    /// Persist a token, creating parent directories if needed.
    ///
    /// Sets file permissions to 0o600.
    pub fn save(&self, token: &str) -> Result<()> {
        let stored = StoredAuth {
            version: STORAGE_VERSION,
            access_token: Some(token.to_owned()),
            last_updated: Some(chrono::Utc::now().to_rfc3339()),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&self.path, perms);
        }

        Ok(())
    }

    /// Delete the stored token. Missing file is a no-op.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
