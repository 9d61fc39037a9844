//! Gated features.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ParseFeatureError;

/// A gated capability or content area.
///
/// The set is closed. Adding a variant forces a new row in
/// [`crate::entitlements`] at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    /// Blog and about pages.
    ContentReadonly,
    /// Muscle-group exercise browser.
    ExerciseBrowser,
    /// Workout statistics dashboard.
    PerformanceDashboard,
    /// Swipeable exercise video carousel.
    VideoCarousel,
    /// Assistant / recommendation features.
    AssistantFeatures,
}

impl Feature {
    /// Every feature in declaration order.
    pub const ALL: [Feature; 5] = [
        Feature::ContentReadonly,
        Feature::ExerciseBrowser,
        Feature::PerformanceDashboard,
        Feature::VideoCarousel,
        Feature::AssistantFeatures,
    ];

    /// Canonical kebab-case identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ContentReadonly => "content-readonly",
            Self::ExerciseBrowser => "exercise-browser",
            Self::PerformanceDashboard => "performance-dashboard",
            Self::VideoCarousel => "video-carousel",
            Self::AssistantFeatures => "assistant-features",
        }
    }

    /// Older identifiers still used by route declarations.
    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::ContentReadonly => &["blog", "about"],
            Self::ExerciseBrowser => &["anatomy"],
            Self::PerformanceDashboard => &["dashboard"],
            Self::VideoCarousel => &["video-swipe"],
            Self::AssistantFeatures => &["ai-features"],
        }
    }

    /// Parse an identifier, returning `None` for anything outside the set.
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Feature {
    type Err = ParseFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Feature::ALL
            .into_iter()
            .find(|f| f.id() == key || f.aliases().contains(&key))
            .ok_or_else(|| ParseFeatureError(s.to_string()))
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
