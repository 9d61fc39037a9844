//! Command execution.
//!
//! [`App`] owns the restored session and builds the guard, navigator,
//! backend client and checkout flow from settings. Every command returns a
//! JSON value for `main` to print.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use byklab_access::{AccessGuard, GuardConfig, Navigator, RouteTable};
use byklab_auth::{FileSessionStore, SessionManager};
use byklab_client::{BackendClient, Checkout, PlanSelection};
use byklab_core::{CardDetails, Plan, PlanCatalog, Tier, entitlements};
use byklab_settings::ByklabSettings;
use serde_json::{Value, json};
use tracing::warn;

use crate::Command;

pub(crate) struct App {
    settings: ByklabSettings,
    session: Arc<SessionManager>,
}

impl App {
    /// Open the file store and restore the persisted session.
    pub(crate) fn open(settings: ByklabSettings) -> Self {
        let store = FileSessionStore::new(
            &settings.storage.resolved_data_dir(),
            &settings.storage.storage_key,
        );
        let session = Arc::new(SessionManager::new(Arc::new(store)));
        let _ = session.restore();
        Self { settings, session }
    }

    fn navigator(&self) -> Navigator {
        let routes = &self.settings.routes;
        let guard = AccessGuard::new(self.session.clone(), GuardConfig::from(routes));
        Navigator::new(RouteTable::standard(routes), guard)
    }

    fn backend(&self) -> Result<BackendClient> {
        BackendClient::new(&self.settings.api).context("failed to build HTTP client")
    }

    fn checkout(&self) -> Result<Checkout> {
        Ok(Checkout::new(
            self.session.clone(),
            self.backend()?,
            self.settings.routes.clone(),
        ))
    }

    async fn catalog(&self, offline: bool) -> Result<PlanCatalog> {
        if offline {
            return Ok(PlanCatalog::default());
        }
        self.backend()?
            .plans()
            .await
            .context("failed to fetch plan catalog")
    }

    pub(crate) async fn run(&self, command: Command) -> Result<Value> {
        match command {
            Command::Signup {
                email,
                password,
                name,
            } => {
                let identity = self.backend()?.signup(&email, &password, &name).await?;
                self.session.login(identity.clone())?;
                Ok(json!({ "user": identity }))
            }
            Command::Login { email, password } => {
                let identity = self.backend()?.login(&email, &password).await?;
                self.session.login(identity.clone())?;
                Ok(json!({ "user": identity }))
            }
            Command::Logout => {
                self.session.logout()?;
                Ok(json!({ "user": null }))
            }
            Command::Whoami => Ok(json!({ "user": self.session.current_identity() })),
            Command::Check { feature } => Ok(self.check(&feature)),
            Command::Features { tier } => self.features(tier.as_deref()),
            Command::Visit { path } => Ok(serde_json::to_value(self.navigator().navigate(&path))?),
            Command::Plans { offline } => Ok(serde_json::to_value(self.catalog(offline).await?)?),
            Command::Select { plan, offline } => {
                let catalog = self.catalog(offline).await?;
                let plan = find_plan(&catalog, &plan)?;
                Ok(selection_json(&self.checkout()?.select(plan)))
            }
            Command::Purchase {
                plan,
                card_number,
                card_name,
                expiry,
                cvv,
            } => {
                let catalog = self.catalog(false).await?;
                let plan = find_plan(&catalog, &plan)?;
                let card = CardDetails {
                    card_number,
                    card_name,
                    expiry,
                    cvv,
                };
                let purchase = self.checkout()?.purchase(plan, card).await?;
                Ok(json!({
                    "user": purchase.identity,
                    "message": purchase.message,
                    "next": purchase.next,
                }))
            }
        }
    }

    fn check(&self, feature: &str) -> Value {
        let identity = self.session.current_identity();
        let allowed = identity
            .as_ref()
            .is_some_and(|i| entitlements::check_named(i.tier, feature));
        if identity.is_none() {
            warn!(feature, "access check without a logged-in user");
        }
        json!({
            "feature": feature,
            "tier": identity.map(|i| i.tier),
            "allowed": allowed,
        })
    }

    fn features(&self, tier: Option<&str>) -> Result<Value> {
        let tier = match tier {
            Some(raw) => raw.parse::<Tier>()?,
            None => self
                .session
                .current_identity()
                .map(|i| i.tier)
                .ok_or_else(|| anyhow!("not logged in; pass --tier"))?,
        };
        Ok(json!({
            "tier": tier,
            "features": entitlements::granted_features(tier),
        }))
    }
}

fn find_plan<'a>(catalog: &'a PlanCatalog, key: &str) -> Result<&'a Plan> {
    if let Some(plan) = catalog.get(key).or_else(|| catalog.find_by_name(key)) {
        return Ok(plan);
    }
    match key.parse::<Tier>() {
        Ok(tier) => catalog
            .for_tier(tier)
            .ok_or_else(|| anyhow!("no plan for tier {tier}")),
        Err(_) => bail!("unknown plan: {key}"),
    }
}

fn selection_json(selection: &PlanSelection) -> Value {
    match selection {
        PlanSelection::Signup { to } => json!({ "selection": "signup", "to": to }),
        PlanSelection::NothingToPay => json!({ "selection": "nothing_to_pay" }),
        PlanSelection::Payment { to, plan } => {
            json!({ "selection": "payment", "to": to, "plan": plan })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(dir: &TempDir, api: &str) -> App {
        let mut settings = ByklabSettings::default();
        settings.storage.data_dir = Some(dir.path().to_string_lossy().into_owned());
        settings.api.base_url = api.to_string();
        App::open(settings)
    }

    fn user_json(plan: &str) -> Value {
        json!({
            "id": "c0ffee",
            "email": "mert@example.com",
            "full_name": "Mert Öz",
            "created_at": "2025-05-05T05:05:05Z",
            "subscription_plan": plan
        })
    }

    #[tokio::test]
    async fn logged_out_visit_redirects_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let out = app(&dir, "http://localhost:1")
            .run(Command::Visit {
                path: "/anatomy".into(),
            })
            .await
            .unwrap();
        assert_eq!(out["outcome"], "redirect");
        assert_eq!(out["to"], "/login");
    }

    #[tokio::test]
    async fn login_persists_across_app_instances() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("Temel")))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let out = app(&dir, &server.uri())
            .run(Command::Login {
                email: "mert@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        assert_eq!(out["user"]["tier"], "basic");

        let reopened = app(&dir, &server.uri());
        let who = reopened.run(Command::Whoami).await.unwrap();
        assert_eq!(who["user"]["display_name"], "Mert Öz");

        let visit = reopened
            .run(Command::Visit {
                path: "/dashboard".into(),
            })
            .await
            .unwrap();
        assert_eq!(visit["outcome"], "content");

        let check = reopened
            .run(Command::Check {
                feature: "video-swipe".into(),
            })
            .await
            .unwrap();
        assert_eq!(check["allowed"], false);
    }

    #[tokio::test]
    async fn logout_clears_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("Ücretsiz")))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let first = app(&dir, &server.uri());
        let _ = first
            .run(Command::Signup {
                email: "mert@example.com".into(),
                password: "pw".into(),
                name: "Mert Öz".into(),
            })
            .await
            .unwrap();
        let _ = first.run(Command::Logout).await.unwrap();

        let who = app(&dir, &server.uri()).run(Command::Whoami).await.unwrap();
        assert!(who["user"].is_null());
    }

    #[tokio::test]
    async fn unknown_feature_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let out = app(&dir, "http://localhost:1")
            .run(Command::Check {
                feature: "teleport".into(),
            })
            .await
            .unwrap();
        assert_eq!(out["allowed"], false);
        assert!(out["tier"].is_null());
    }

    #[tokio::test]
    async fn features_for_explicit_tier() {
        let dir = tempfile::tempdir().unwrap();
        let out = app(&dir, "http://localhost:1")
            .run(Command::Features {
                tier: Some("Gelişmiş".into()),
            })
            .await
            .unwrap();
        assert_eq!(out["tier"], "advanced");
        assert_eq!(out["features"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn offline_select_while_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let out = app(&dir, "http://localhost:1")
            .run(Command::Select {
                plan: "Kapsamlı".into(),
                offline: true,
            })
            .await
            .unwrap();
        assert_eq!(out["selection"], "signup");
        assert_eq!(out["to"], "/signup");
    }

    #[test]
    fn find_plan_by_id_name_or_tier() {
        let catalog = PlanCatalog::default();
        assert_eq!(find_plan(&catalog, "basic").unwrap().name, "Temel");
        assert_eq!(find_plan(&catalog, "Temel").unwrap().id, "basic");
        assert_eq!(find_plan(&catalog, "ADVANCED").unwrap().id, "advanced");
        assert!(find_plan(&catalog, "gold").is_err());
    }
}
