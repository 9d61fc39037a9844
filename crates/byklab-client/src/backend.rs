//! HTTP client for the BYKLAB backend.
//!
//! All endpoints live under `<base_url>/api`. Non-success responses become
//! [`ClientError::Status`] carrying the backend's `detail` message when the
//! body is a JSON error, or the raw body text otherwise.

use std::time::Duration;

use byklab_core::{Identity, PaymentRequest, PlanCatalog};
use byklab_settings::ApiSettings;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{ClientError, Result};

/// Result of `POST /api/subscriptions/activate`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Activation {
    /// Whether the plan was activated.
    pub success: bool,
    /// Message for the user.
    #[serde(default)]
    pub message: String,
    /// Name of the activated plan.
    #[serde(default)]
    pub plan: String,
}

#[derive(Serialize)]
struct SignupBody<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Backend API client.
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client from API settings.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .user_agent(concat!("byklab/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, &settings.base_url))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Backend origin.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// Create an account. The new user starts on the free plan.
    pub async fn signup(&self, email: &str, password: &str, full_name: &str) -> Result<Identity> {
        debug!(email, "signing up");
        let response = self
            .client
            .post(self.url("/auth/signup"))
            .json(&SignupBody {
                email,
                password,
                full_name,
            })
            .send()
            .await?;
        decode(response).await
    }

    /// Exchange credentials for the user payload.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        debug!(email, "logging in");
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginBody { email, password })
            .send()
            .await?;
        decode(response).await
    }

    /// Current plan catalog.
    pub async fn plans(&self) -> Result<PlanCatalog> {
        let response = self
            .client
            .get(self.url("/subscriptions/plans"))
            .send()
            .await?;
        decode(response).await
    }

    /// Submit a demo payment for a plan.
    pub async fn activate(&self, request: &PaymentRequest) -> Result<Activation> {
        debug!(plan = %request.plan_name, "activating subscription");
        let response = self
            .client
            .post(self.url("/subscriptions/activate"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body);
    warn!(status = status.as_u16(), %message, "backend request failed");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

/// `detail` from a JSON error body, else the body itself.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(serde_json::Value::as_str).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
