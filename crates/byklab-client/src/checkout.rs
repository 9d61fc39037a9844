//! Plan selection and purchase.
//!
//! Selecting a plan while logged out sends the user to signup. A zero-price
//! plan needs nothing. Any other plan goes to payment, and arriving at
//! payment without a plan bounces back to the catalog.
//!
//! A purchase validates the card locally, asks the backend to activate the
//! plan, and only after a confirmed activation upgrades the live session.

use std::sync::Arc;

use byklab_access::GuardOutcome;
use byklab_auth::{AuthError, SessionManager};
use byklab_core::{CardDetails, Identity, PaymentRequest, Plan};
use byklab_settings::RouteSettings;
use tracing::{info, warn};

use crate::backend::BackendClient;
use crate::errors::{ClientError, Result};

/// Where selecting a plan leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanSelection {
    /// Not logged in; go to signup.
    Signup {
        /// Signup destination.
        to: String,
    },
    /// Free plan; nothing to pay.
    NothingToPay,
    /// Go to payment for this plan.
    Payment {
        /// Payment destination.
        to: String,
        /// Plan being purchased.
        plan: Plan,
    },
}

/// Confirmed purchase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Purchase {
    /// Identity after the tier change.
    pub identity: Identity,
    /// Backend confirmation message.
    pub message: String,
    /// Navigation to perform next.
    pub next: GuardOutcome,
}

/// Checkout flow bound to the live session and the backend.
#[derive(Clone, Debug)]
pub struct Checkout {
    session: Arc<SessionManager>,
    backend: BackendClient,
    routes: RouteSettings,
}

impl Checkout {
    /// New checkout flow.
    pub fn new(session: Arc<SessionManager>, backend: BackendClient, routes: RouteSettings) -> Self {
        Self {
            session,
            backend,
            routes,
        }
    }

    /// Outcome of picking `plan` in the catalog.
    pub fn select(&self, plan: &Plan) -> PlanSelection {
        if !self.session.is_authenticated() {
            return PlanSelection::Signup {
                to: self.routes.signup_path.clone(),
            };
        }
        if plan.is_free() {
            return PlanSelection::NothingToPay;
        }
        PlanSelection::Payment {
            to: self.routes.payment_path.clone(),
            plan: plan.clone(),
        }
    }

    /// Outcome of opening the payment page with or without a selected plan.
    pub fn enter_payment(&self, plan: Option<&Plan>) -> GuardOutcome {
        match plan {
            Some(_) => GuardOutcome::Content,
            None => GuardOutcome::redirect(self.routes.pricing_path.as_str()),
        }
    }

    /// Pay for `plan` and upgrade the session.
    ///
    /// The session is untouched unless the backend confirms activation.
    pub async fn purchase(&self, plan: &Plan, card: CardDetails) -> Result<Purchase> {
        let tier = plan
            .tier()
            .ok_or_else(|| ClientError::UnknownPlan(plan.name.clone()))?;
        if !self.session.is_authenticated() {
            return Err(ClientError::Session(AuthError::NoActiveSession));
        }
        card.validate()?;

        let activation = self
            .backend
            .activate(&PaymentRequest::new(plan.name.as_str(), card))
            .await?;
        if !activation.success {
            warn!(plan = %plan.name, message = %activation.message, "activation declined");
            return Err(ClientError::ActivationDeclined(activation.message));
        }

        let identity = self.session.upgrade_tier(tier)?;
        info!(user = %identity.id, %tier, "subscription activated");
        Ok(Purchase {
            identity,
            message: activation.message,
            next: GuardOutcome::Redirect {
                to: self.routes.dashboard_path.clone(),
                replace: false,
            },
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use byklab_auth::{MemorySessionStore, SessionStore};
    use byklab_core::{PaymentField, PlanCatalog, Tier};
    use byklab_settings::ApiSettings;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn card() -> CardDetails {
        CardDetails {
            card_number: "4242424242424242".into(),
            card_name: "Elif Şahin".into(),
            expiry: "08/28".into(),
            cvv: "321".into(),
        }
    }

    fn plan(tier: Tier) -> Plan {
        PlanCatalog::default().for_tier(tier).unwrap().clone()
    }

    fn logged_in(tier: Tier) -> (Arc<MemorySessionStore>, Arc<SessionManager>) {
        let store = Arc::new(MemorySessionStore::new());
        let session = Arc::new(SessionManager::new(store.clone()));
        let _ = session.restore();
        session
            .login(Identity::new("u-5", "Elif Şahin", "elif@example.com", tier))
            .unwrap();
        (store, session)
    }

    fn checkout(session: Arc<SessionManager>, base_url: &str) -> Checkout {
        let backend = BackendClient::new(&ApiSettings {
            base_url: base_url.to_string(),
            timeout_ms: 2_000,
        })
        .unwrap();
        Checkout::new(session, backend, RouteSettings::default())
    }

    async fn activation_server(status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/subscriptions/activate"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    // ── Plan selection ───────────────────────────────────────────────

    #[test]
    fn logged_out_selection_goes_to_signup() {
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStore::new())));
        let _ = session.restore();
        let flow = checkout(session, "http://localhost:1");
        assert_eq!(
            flow.select(&plan(Tier::Advanced)),
            PlanSelection::Signup {
                to: "/signup".into()
            }
        );
    }

    #[test]
    fn free_plan_needs_nothing() {
        let (_, session) = logged_in(Tier::Free);
        let flow = checkout(session, "http://localhost:1");
        assert_eq!(flow.select(&plan(Tier::Free)), PlanSelection::NothingToPay);
    }

    #[test]
    fn paid_plan_goes_to_payment() {
        let (_, session) = logged_in(Tier::Free);
        let flow = checkout(session, "http://localhost:1");
        assert_matches!(flow.select(&plan(Tier::Basic)), PlanSelection::Payment { to, plan } => {
            assert_eq!(to, "/payment");
            assert_eq!(plan.price, 100);
        });
    }

    #[test]
    fn payment_without_plan_redirects_to_pricing() {
        let (_, session) = logged_in(Tier::Free);
        let flow = checkout(session, "http://localhost:1");
        assert_eq!(flow.enter_payment(None), GuardOutcome::redirect("/pricing"));
        assert!(flow.enter_payment(Some(&plan(Tier::Basic))).is_content());
    }

    // ── Purchase ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn successful_purchase_upgrades_and_persists() {
        let server = activation_server(
            200,
            serde_json::json!({"success": true, "message": "Aboneliğiniz aktif hale geldi", "plan": "Gelişmiş"}),
        )
        .await;
        let (store, session) = logged_in(Tier::Basic);
        let flow = checkout(session.clone(), &server.uri());

        let purchase = flow.purchase(&plan(Tier::Advanced), card()).await.unwrap();
        assert_eq!(purchase.identity.tier, Tier::Advanced);
        assert_eq!(
            purchase.next,
            GuardOutcome::Redirect {
                to: "/dashboard".into(),
                replace: false
            }
        );
        assert_eq!(session.current_identity().unwrap().tier, Tier::Advanced);
        assert_eq!(store.read().unwrap().tier, Tier::Advanced);
    }

    #[tokio::test]
    async fn invalid_card_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let (_, session) = logged_in(Tier::Basic);
        let flow = checkout(session.clone(), &server.uri());

        let bad = CardDetails {
            cvv: "12".into(),
            ..card()
        };
        let err = flow.purchase(&plan(Tier::Advanced), bad).await.unwrap_err();
        assert_matches!(err, ClientError::Validation(v) if v.has(PaymentField::Cvv));
        assert_eq!(session.current_identity().unwrap().tier, Tier::Basic);
    }

    #[tokio::test]
    async fn backend_failure_keeps_tier() {
        let server = activation_server(500, serde_json::json!({"detail": "boom"})).await;
        let (store, session) = logged_in(Tier::Basic);
        let flow = checkout(session.clone(), &server.uri());

        let err = flow.purchase(&plan(Tier::Comprehensive), card()).await.unwrap_err();
        assert_matches!(err, ClientError::Status { status: 500, .. });
        assert_eq!(session.current_identity().unwrap().tier, Tier::Basic);
        assert_eq!(store.read().unwrap().tier, Tier::Basic);
    }

    #[tokio::test]
    async fn declined_activation_keeps_tier() {
        let server =
            activation_server(200, serde_json::json!({"success": false, "message": "declined"})).await;
        let (_, session) = logged_in(Tier::Free);
        let flow = checkout(session.clone(), &server.uri());

        let err = flow.purchase(&plan(Tier::Basic), card()).await.unwrap_err();
        assert_matches!(err, ClientError::ActivationDeclined(m) if m == "declined");
        assert_eq!(session.current_identity().unwrap().tier, Tier::Free);
    }

    #[tokio::test]
    async fn purchase_without_session_is_rejected() {
        let server = MockServer::start().await;
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStore::new())));
        let _ = session.restore();
        let flow = checkout(session, &server.uri());

        let err = flow.purchase(&plan(Tier::Basic), card()).await.unwrap_err();
        assert_matches!(err, ClientError::Session(AuthError::NoActiveSession));
    }

    #[tokio::test]
    async fn unmapped_plan_is_rejected() {
        let (_, session) = logged_in(Tier::Free);
        let flow = checkout(session, "http://localhost:1");
        let odd = Plan {
            id: "gold".into(),
            name: "Altın".into(),
            price: 900,
            features: Vec::new(),
            has_anatomy: true,
            has_video_swipe: true,
        };
        let err = flow.purchase(&odd, card()).await.unwrap_err();
        assert_matches!(err, ClientError::UnknownPlan(name) if name == "Altın");
    }
}
