//! # byklab-settings
//!
//! Layered configuration for the BYKLAB client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`ByklabSettings::default()`]
//! 2. **User file**: `~/.byklab/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `BYKLAB_*` overrides (highest priority)
//!
//! There is no global instance. The binary loads settings once and passes
//! the pieces each component needs.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
