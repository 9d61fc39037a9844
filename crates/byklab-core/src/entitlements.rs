//! Entitlement resolution.
//!
//! The policy table below is authoritative. Grants do not nest by tier
//! position in general, so every feature carries an explicit row instead of a
//! minimum-tier threshold. The row lookup is an exhaustive `match`, so a new
//! [`Feature`] variant without a row does not compile.
//!
//! | Feature               | Free | Basic | Advanced | Comprehensive |
//! |-----------------------|------|-------|----------|---------------|
//! | content-readonly      | ✓    | ✓     | ✓        | ✓             |
//! | exercise-browser      |      | ✓     | ✓        | ✓             |
//! | performance-dashboard |      | ✓     | ✓        | ✓             |
//! | video-carousel        |      |       | ✓        | ✓             |
//! | assistant-features    |      |       |          | ✓             |

use tracing::debug;

use crate::feature::Feature;
use crate::identity::Identity;
use crate::tier::Tier;

/// Grants for one feature, indexed by [`Tier::position`].
const fn row(feature: Feature) -> [bool; Tier::COUNT] {
    match feature {
        Feature::ContentReadonly => [true, true, true, true],
        Feature::ExerciseBrowser => [false, true, true, true],
        Feature::PerformanceDashboard => [false, true, true, true],
        Feature::VideoCarousel => [false, false, true, true],
        Feature::AssistantFeatures => [false, false, false, true],
    }
}

/// Whether `tier` is entitled to `feature`.
#[must_use]
pub const fn check(tier: Tier, feature: Feature) -> bool {
    row(feature)[tier.position()]
}

/// Resolve an entitlement from a raw feature identifier.
///
/// Identifiers outside the closed set deny.
pub fn check_named(tier: Tier, feature: &str) -> bool {
    match Feature::parse(feature) {
        Some(f) => check(tier, f),
        None => {
            debug!(feature, %tier, "unknown feature identifier, denying");
            false
        }
    }
}

/// Resolve an entitlement for an optional identity.
///
/// No identity denies every feature, including read-only content.
pub fn check_identity(identity: Option<&Identity>, feature: Feature) -> bool {
    identity.is_some_and(|i| check(i.tier, feature))
}

/// The first tier in catalog order that is granted `feature`.
pub fn minimum_tier(feature: Feature) -> Option<Tier> {
    Tier::ALL.into_iter().find(|t| check(*t, feature))
}

/// Features unlocked by `tier`, in declaration order.
pub fn granted_features(tier: Tier) -> Vec<Feature> {
    Feature::ALL
        .into_iter()
        .filter(|f| check(tier, *f))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
