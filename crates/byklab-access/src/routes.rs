//! Route table and navigation.
//!
//! Every path resolves to an outcome: public destinations render directly,
//! protected ones go through the [`AccessGuard`], and anything unmatched is
//! replace-redirected to the home page.

use byklab_core::{Feature, ParseFeatureError};
use byklab_settings::RouteSettings;
use tracing::debug;

use crate::guard::{AccessGuard, GuardOutcome};

/// Who may see a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Anyone, logged in or not.
    Public,
    /// Logged-in users, optionally gated on one feature.
    Protected {
        /// Feature the destination requires, if any.
        feature: Option<Feature>,
    },
}

/// One declared destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pattern: String,
    access: Access,
}

impl Route {
    /// The path pattern; `:name` segments match any single segment.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Access rule for this destination.
    pub fn access(&self) -> Access {
        self.access
    }

    fn matches(&self, path: &str) -> bool {
        let mut want = segments(&self.pattern);
        let mut have = segments(path);
        loop {
            match (want.next(), have.next()) {
                (None, None) => return true,
                (Some(w), Some(h)) if w.starts_with(':') || w == h => {}
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strip query string and fragment.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Ordered set of destinations plus the fallback for unknown paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: String,
}

impl RouteTable {
    /// Empty table redirecting unknown paths to `fallback`.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            routes: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Add a public destination.
    #[must_use]
    pub fn public(mut self, pattern: impl Into<String>) -> Self {
        self.routes.push(Route {
            pattern: pattern.into(),
            access: Access::Public,
        });
        self
    }

    /// Add a protected destination.
    #[must_use]
    pub fn protected(mut self, pattern: impl Into<String>, feature: Option<Feature>) -> Self {
        self.routes.push(Route {
            pattern: pattern.into(),
            access: Access::Protected { feature },
        });
        self
    }

    /// Add a protected destination declared with a feature identifier.
    ///
    /// Identifiers outside the feature set are rejected when the table is
    /// built instead of silently denying at navigation time.
    pub fn protected_named(
        self,
        pattern: impl Into<String>,
        feature: &str,
    ) -> Result<Self, ParseFeatureError> {
        let feature: Feature = feature.parse()?;
        Ok(self.protected(pattern, Some(feature)))
    }

    /// The application's destinations.
    pub fn standard(routes: &RouteSettings) -> Self {
        Self::new(routes.home_path.as_str())
            .public(routes.home_path.as_str())
            .public(routes.login_path.as_str())
            .public(routes.signup_path.as_str())
            .public(routes.pricing_path.as_str())
            .public("/blog")
            .public("/blog/:id")
            .public("/about")
            .protected(routes.payment_path.as_str(), None)
            .protected("/anatomy", Some(Feature::ExerciseBrowser))
            .protected(routes.dashboard_path.as_str(), Some(Feature::PerformanceDashboard))
    }

    /// First route matching `path`.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = normalize(path);
        self.routes.iter().find(|r| r.matches(path))
    }

    /// Declared routes in order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Where unknown paths go.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

/// Resolves paths and applies the guard to protected ones.
#[derive(Clone, Debug)]
pub struct Navigator {
    table: RouteTable,
    guard: AccessGuard,
}

impl Navigator {
    /// Navigator over `table` using `guard` for protected routes.
    pub fn new(table: RouteTable, guard: AccessGuard) -> Self {
        Self { table, guard }
    }

    /// Outcome of navigating to `path`.
    pub fn navigate(&self, path: &str) -> GuardOutcome {
        match self.table.resolve(path).map(Route::access) {
            Some(Access::Public) => GuardOutcome::Content,
            Some(Access::Protected { feature }) => self.guard.evaluate(feature),
            None => {
                debug!(path, fallback = self.table.fallback(), "no route matched");
                GuardOutcome::redirect(self.table.fallback())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
