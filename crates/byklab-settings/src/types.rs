//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a settings
//! file may be partial: missing fields get their default value.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "api": { "baseUrl": "https://byklab.example.com" },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ByklabSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Where the session record is persisted.
    pub storage: StorageSettings,
    /// Navigation destinations used by the access guard.
    pub routes: RouteSettings,
    /// Backend API connection.
    pub api: ApiSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for ByklabSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "byklab".to_string(),
            storage: StorageSettings::default(),
            routes: RouteSettings::default(),
            api: ApiSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ByklabSettings {
    /// Reject values the rest of the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.storage.storage_key.trim().is_empty() {
            return Err(SettingsError::rejected("storage.storageKey", "must not be empty"));
        }
        for (name, path) in self.routes.named() {
            if !path.starts_with('/') {
                return Err(SettingsError::rejected(
                    format!("routes.{name}"),
                    format!("must start with '/', got {path:?}"),
                ));
            }
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(SettingsError::rejected(
                "api.baseUrl",
                format!("must be an http(s) URL, got {:?}", self.api.base_url),
            ));
        }
        Ok(())
    }
}

/// Session persistence settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Directory holding the session record. Defaults to `~/.byklab`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Fixed key the session record is stored under.
    pub storage_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: "byklab_user".to_string(),
        }
    }
}

impl StorageSettings {
    /// The configured data directory, or `~/.byklab`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(),
        }
    }
}

/// `~/.byklab`, falling back to `/tmp` when `HOME` is unset.
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".byklab")
}

/// Navigation destinations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteSettings {
    /// Landing page; also the fallback for unknown paths.
    pub home_path: String,
    /// Where unauthenticated users are sent.
    pub login_path: String,
    /// Account creation.
    pub signup_path: String,
    /// Plan catalog, linked from the upgrade prompt.
    pub pricing_path: String,
    /// Payment form.
    pub payment_path: String,
    /// Stats dashboard, shown after a successful purchase.
    pub dashboard_path: String,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            home_path: "/".to_string(),
            login_path: "/login".to_string(),
            signup_path: "/signup".to_string(),
            pricing_path: "/pricing".to_string(),
            payment_path: "/payment".to_string(),
            dashboard_path: "/dashboard".to_string(),
        }
    }
}

impl RouteSettings {
    fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("homePath", self.home_path.as_str()),
            ("loginPath", self.login_path.as_str()),
            ("signupPath", self.signup_path.as_str()),
            ("pricingPath", self.pricing_path.as_str()),
            ("paymentPath", self.payment_path.as_str()),
            ("dashboardPath", self.dashboard_path.as_str()),
        ]
    }
}

/// Backend API settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Backend origin; endpoints live under `/api`.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level written to stderr (`RUST_LOG` wins when set).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
