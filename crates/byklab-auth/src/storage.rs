//! Session store.
//!
//! One serialized [`Identity`] lives under a fixed storage key. Absence of
//! the record means logged out. The record is wrapped in a versioned
//! envelope:
//!
//! ```json
//! { "version": 1, "user": { "id": "...", ... }, "lastUpdated": "2025-01-01T00:00:00Z" }
//! ```
//!
//! Anything that fails to parse, or carries an unknown version, reads as
//! absent so restoration is never blocked by bad data.

use std::path::{Path, PathBuf};

use byklab_core::Identity;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Default storage key.
pub const DEFAULT_STORAGE_KEY: &str = "byklab_user";

/// Envelope version written by this client.
const STORE_VERSION: u32 = 1;

/// Persistence contract for the live session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Replace the stored record with `identity`.
    fn persist(&self, identity: &Identity) -> Result<(), AuthError>;

    /// Read the stored identity. Missing or malformed data is `None`.
    fn read(&self) -> Option<Identity>;

    /// Remove the stored record. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), AuthError>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    version: u32,
    user: Identity,
    #[serde(default)]
    last_updated: String,
}

fn encode(identity: &Identity) -> Result<String, AuthError> {
    let record = StoredSession {
        version: STORE_VERSION,
        user: identity.clone(),
        last_updated: chrono::Utc::now().to_rfc3339(),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

fn decode(data: &str) -> Option<Identity> {
    match serde_json::from_str::<StoredSession>(data) {
        Ok(record) if record.version == STORE_VERSION => Some(record.user),
        Ok(record) => {
            tracing::warn!(version = record.version, "unsupported session record version");
            None
        }
        Err(e) => {
            tracing::warn!("failed to parse session record: {e}");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File store
// ─────────────────────────────────────────────────────────────────────────────

/// Session record kept at `<data_dir>/<storage_key>.json`.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store under `data_dir` using `storage_key` as the file stem.
    pub fn new(data_dir: &Path, storage_key: &str) -> Self {
        Self {
            path: data_dir.join(format!("{storage_key}.json")),
        }
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    /// Writes to a sibling temp file and renames it over the record, so a
    /// crash leaves either the old record or the new one.
    fn persist(&self, identity: &Identity) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = encode(identity)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&tmp, perms);
        }

        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), user = %identity.id, "session persisted");
        Ok(())
    }

    fn read(&self) -> Option<Identity> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("failed to read session file: {e}");
                return None;
            }
        };
        decode(&data)
    }

    fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Io(e)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Store that keeps the serialized record in memory.
///
/// Uses the same encoding as [`FileSessionStore`], so malformed-data handling
/// is identical.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with raw record text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Raw record text, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn persist(&self, identity: &Identity) -> Result<(), AuthError> {
        let json = encode(identity)?;
        *self.slot.lock() = Some(json);
        Ok(())
    }

    fn read(&self) -> Option<Identity> {
        self.slot.lock().as_deref().and_then(decode)
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
