//! The authenticated user.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// Opaque user identifier assigned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An authenticated user and their active subscription tier.
///
/// Deserialization also accepts the backend's user payload, which names the
/// fields `full_name` and `subscription_plan`, carries extra fields such as
/// `created_at`, and may omit the plan entirely (meaning Free).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend user id.
    pub id: UserId,
    /// Name shown in the UI.
    #[serde(alias = "full_name")]
    pub display_name: String,
    /// Login email.
    pub email: String,
    /// Active subscription tier.
    #[serde(default, alias = "subscription_plan")]
    pub tier: Tier,
}

impl Identity {
    /// Build an identity.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        tier: Tier,
    ) -> Self {
        Self {
            id: UserId::new(id),
            display_name: display_name.into(),
            email: email.into(),
            tier,
        }
    }

    /// Copy of this identity with only the tier replaced.
    #[must_use]
    pub fn with_tier(&self, tier: Tier) -> Self {
        Self {
            tier,
            ..self.clone()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
