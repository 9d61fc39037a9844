//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ByklabSettings::default()`]
//! 2. If `~/.byklab/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `BYKLAB_*` environment variable overrides (highest priority)
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::{ByklabSettings, default_data_dir};

/// Resolve the path to the settings file (`~/.byklab/settings.json`).
pub fn settings_path() -> PathBuf {
    default_data_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ByklabSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON or invalid values are errors.
pub fn load_settings_from_path(path: &Path) -> Result<ByklabSettings> {
    let defaults = serde_json::to_value(ByklabSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content =
            std::fs::read_to_string(path).map_err(|source| SettingsError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: ByklabSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning (file/default value is kept).
pub fn apply_env_overrides(settings: &mut ByklabSettings) {
    // ── Storage ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("BYKLAB_DATA_DIR") {
        settings.storage.data_dir = Some(v);
    }
    if let Some(v) = read_env_string("BYKLAB_STORAGE_KEY") {
        settings.storage.storage_key = v;
    }

    // ── API ─────────────────────────────────────────────────────────
    if let Some(v) = read_env_string("BYKLAB_API_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = read_env_u64("BYKLAB_API_TIMEOUT_MS", 100, 600_000) {
        settings.api.timeout_ms = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("BYKLAB_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

/// Parse a string as a `u64` within an inclusive range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({
            "api": {"baseUrl": "http://localhost:8001", "timeoutMs": 10000}
        });
        let source = serde_json::json!({
            "api": {"timeoutMs": 500}
        });
        let merged = deep_merge(target, source);
        assert_eq!(merged["api"]["timeoutMs"], 500);
        assert_eq!(merged["api"]["baseUrl"], "http://localhost:8001");
    }

    #[test]
    fn merge_null_keeps_default_data_dir() {
        let target = serde_json::json!({
            "storage": {"dataDir": "/var/lib/byklab", "storageKey": "byklab_user"}
        });
        let source = serde_json::json!({"storage": {"dataDir": null}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["storage"]["dataDir"], "/var/lib/byklab");
        assert_eq!(merged["storage"]["storageKey"], "byklab_user");
    }

    #[test]
    fn merge_keeps_sibling_routes() {
        let defaults = serde_json::to_value(ByklabSettings::default()).unwrap();
        let source = serde_json::json!({"routes": {"pricingPath": "/plans"}});
        let merged = deep_merge(defaults, source);
        assert_eq!(merged["routes"]["pricingPath"], "/plans");
        assert_eq!(merged["routes"]["loginPath"], "/login");
        assert_eq!(merged["routes"]["dashboardPath"], "/dashboard");
    }

    #[test]
    fn merge_scalar_over_section_replaces_it() {
        let defaults = serde_json::to_value(ByklabSettings::default()).unwrap();
        let source = serde_json::json!({"routes": "/"});
        let merged = deep_merge(defaults, source);
        assert_eq!(merged["routes"], "/");
        assert!(serde_json::from_value::<ByklabSettings>(merged).is_err());
    }

    #[test]
    fn merge_unknown_section_is_carried_and_ignored() {
        let defaults = serde_json::to_value(ByklabSettings::default()).unwrap();
        let source = serde_json::json!({"theme": {"accent": "teal"}});
        let merged = deep_merge(defaults, source);
        assert_eq!(merged["theme"]["accent"], "teal");
        let settings: ByklabSettings = serde_json::from_value(merged).unwrap();
        assert_eq!(settings, ByklabSettings::default());
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings = load_settings_from_path(Path::new("/nonexistent/settings.json")).unwrap();
        let defaults = ByklabSettings::default();
        assert_eq!(settings.routes, defaults.routes);
        assert_eq!(settings.storage.storage_key, defaults.storage.storage_key);
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"routes": {"pricingPath": "/plans"}, "logging": {"level": "debug"}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.routes.pricing_path, "/plans");
        assert_eq!(settings.routes.login_path, "/login");
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_settings_from_path(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::Malformed(_)));
    }

    #[test]
    fn load_invalid_value_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"routes": {"loginPath": "login"}}"#).unwrap();

        let result = load_settings_from_path(&path);
        assert!(matches!(
            result.unwrap_err(),
            SettingsError::Rejected { ref field, .. } if field == "routes.loginPath"
        ));
    }

    #[test]
    fn load_wrong_type_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"api": {"timeoutMs": "fast"}}"#).unwrap();

        assert!(load_settings_from_path(&path).is_err());
    }

    // ── parse_u64_range ─────────────────────────────────────────────

    #[test]
    fn parse_u64_valid() {
        assert_eq!(parse_u64_range("5000", 100, 600_000), Some(5000));
        assert_eq!(parse_u64_range("100", 100, 600_000), Some(100));
    }

    #[test]
    fn parse_u64_out_of_range() {
        assert_eq!(parse_u64_range("99", 100, 600_000), None);
        assert_eq!(parse_u64_range("700000", 100, 600_000), None);
    }

    #[test]
    fn parse_u64_invalid() {
        assert_eq!(parse_u64_range("soon", 100, 600_000), None);
        assert_eq!(parse_u64_range("", 100, 600_000), None);
    }
}
