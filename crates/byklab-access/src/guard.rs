//! Access guard for protected destinations.
//!
//! Evaluation order is fixed:
//!
//! 1. session still restoring → [`GuardOutcome::Pending`]
//! 2. nobody logged in → [`GuardOutcome::Redirect`] to login (replace)
//! 3. required feature denied → [`GuardOutcome::UpgradePrompt`]
//! 4. otherwise → [`GuardOutcome::Content`]
//!
//! Entitlements are never consulted while loading, and an unauthenticated
//! visitor is never shown an upgrade prompt.

use std::sync::Arc;

use byklab_auth::{SessionManager, SessionSnapshot};
use byklab_core::{Feature, Tier, entitlements};
use byklab_settings::RouteSettings;
use serde::Serialize;
use tracing::debug;

/// Under-entitled view: the user is logged in but their tier lacks a feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpgradePrompt {
    /// Feature the destination requires.
    pub feature: Feature,
    /// Tier the user currently holds.
    pub current_tier: Tier,
    /// Cheapest tier that grants the feature.
    pub required_tier: Option<Tier>,
    /// Link to the plan catalog.
    pub catalog_path: String,
}

/// What to render for a navigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Neutral placeholder while the session is being restored.
    Pending,
    /// Go elsewhere. `replace` drops the current entry from history.
    Redirect {
        /// Destination path.
        to: String,
        /// Replace instead of push.
        replace: bool,
    },
    /// Offer a path to the plan catalog.
    UpgradePrompt(UpgradePrompt),
    /// Render the destination.
    Content,
}

impl GuardOutcome {
    /// Replace-redirect to `to`.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            replace: true,
        }
    }

    /// Whether the destination renders.
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content)
    }
}

/// Destinations the guard sends users to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    /// Where unauthenticated users go.
    pub login_path: String,
    /// Plan catalog linked from the upgrade prompt.
    pub pricing_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::from(&RouteSettings::default())
    }
}

impl From<&RouteSettings> for GuardConfig {
    fn from(routes: &RouteSettings) -> Self {
        Self {
            login_path: routes.login_path.clone(),
            pricing_path: routes.pricing_path.clone(),
        }
    }
}

/// Decide the outcome for one session snapshot.
pub fn decide(
    snapshot: &SessionSnapshot,
    required: Option<Feature>,
    config: &GuardConfig,
) -> GuardOutcome {
    if snapshot.loading {
        return GuardOutcome::Pending;
    }

    let Some(identity) = snapshot.identity.as_ref() else {
        return GuardOutcome::redirect(config.login_path.as_str());
    };

    if let Some(feature) = required {
        if !entitlements::check(identity.tier, feature) {
            return GuardOutcome::UpgradePrompt(UpgradePrompt {
                feature,
                current_tier: identity.tier,
                required_tier: entitlements::minimum_tier(feature),
                catalog_path: config.pricing_path.clone(),
            });
        }
    }

    GuardOutcome::Content
}

/// Guard bound to the live session.
#[derive(Clone, Debug)]
pub struct AccessGuard {
    session: Arc<SessionManager>,
    config: GuardConfig,
}

impl AccessGuard {
    /// Guard reading from `session`.
    pub fn new(session: Arc<SessionManager>, config: GuardConfig) -> Self {
        Self { session, config }
    }

    /// Evaluate a navigation to a protected destination.
    ///
    /// Loading flag and identity are read together, so a navigation racing
    /// restoration sees either pending or the fully restored identity.
    pub fn evaluate(&self, required: Option<Feature>) -> GuardOutcome {
        let snapshot = self.session.snapshot();
        let outcome = decide(&snapshot, required, &self.config);
        debug!(
            required = ?required.map(Feature::id),
            outcome = ?outcome,
            "access guard evaluated"
        );
        outcome
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
