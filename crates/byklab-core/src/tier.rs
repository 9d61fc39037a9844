//! Subscription tiers.
//!
//! Tiers are an ordered catalog, not scores. The derived `Ord` follows
//! declaration order, which is the catalog position. Entitlements are never
//! computed from that ordering; see [`crate::entitlements`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ParseTierError;

/// A subscription level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// No paid subscription.
    #[default]
    Free,
    /// Entry-level paid plan.
    Basic,
    /// Mid-level paid plan.
    Advanced,
    /// Top-level paid plan.
    Comprehensive,
}

impl Tier {
    /// Number of tiers in the catalog.
    pub const COUNT: usize = 4;

    /// Every tier in catalog order.
    pub const ALL: [Tier; Self::COUNT] = [
        Tier::Free,
        Tier::Basic,
        Tier::Advanced,
        Tier::Comprehensive,
    ];

    /// Zero-based catalog position.
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }

    /// Canonical identifier, also the plan id in the catalog.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Comprehensive => "comprehensive",
        }
    }

    /// Plan name as shown in the catalog and sent to payment activation.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Free => "Ücretsiz",
            Self::Basic => "Temel",
            Self::Advanced => "Gelişmiş",
            Self::Comprehensive => "Kapsamlı",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tier {
    type Err = ParseTierError;

    /// Accepts the canonical id (any case) or the catalog display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_lowercase();
        Tier::ALL
            .into_iter()
            .find(|t| t.id() == lowered || t.display_name() == trimmed)
            .ok_or_else(|| ParseTierError(s.to_string()))
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
