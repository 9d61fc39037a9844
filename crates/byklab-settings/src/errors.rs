//! Why a settings file could not become a usable [`ByklabSettings`].
//!
//! [`ByklabSettings`]: crate::ByklabSettings

use std::path::PathBuf;

use thiserror::Error;

/// Settings load or validation failure.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        /// File that was being loaded.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not JSON, or a field has the wrong shape.
    #[error("malformed settings: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A field parsed but holds a value the client cannot use.
    #[error("{field}: {reason}")]
    Rejected {
        /// Dotted camelCase path, e.g. `routes.loginPath`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl SettingsError {
    pub(crate) fn rejected(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Settings result.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
