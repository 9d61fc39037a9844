//! Demo payment request and card form validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::PaymentValidationError;

static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").unwrap());

/// Card form fields, named as on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaymentField {
    /// 16-character card number.
    CardNumber,
    /// Card holder name.
    CardName,
    /// `MM/YY` expiry.
    Expiry,
    /// 3-character security code.
    Cvv,
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CardNumber => "card_number",
            Self::CardName => "card_name",
            Self::Expiry => "expiry",
            Self::Cvv => "cvv",
        };
        f.write_str(name)
    }
}

/// Card details as typed into the payment form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    /// Card number.
    pub card_number: String,
    /// Name on the card.
    pub card_name: String,
    /// Expiry as `MM/YY`.
    pub expiry: String,
    /// Security code.
    pub cvv: String,
}

impl CardDetails {
    /// Check every field and report all violations at once.
    pub fn validate(&self) -> Result<(), PaymentValidationError> {
        let mut violations = Vec::new();

        if self.card_number.chars().count() != 16 {
            violations.push((
                PaymentField::CardNumber,
                "card number must be 16 digits".to_string(),
            ));
        }
        if self.card_name.chars().count() < 3 {
            violations.push((
                PaymentField::CardName,
                "enter the card holder's name".to_string(),
            ));
        }
        if !EXPIRY_RE.is_match(&self.expiry) {
            violations.push((PaymentField::Expiry, "format: MM/YY".to_string()));
        }
        if self.cvv.chars().count() != 3 {
            violations.push((PaymentField::Cvv, "CVV must be 3 digits".to_string()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(PaymentValidationError { violations })
        }
    }
}

/// Body of `POST /api/subscriptions/activate`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Display name of the plan being purchased.
    pub plan_name: String,
    /// Card details, flattened into the request body.
    #[serde(flatten)]
    pub card: CardDetails,
}

impl PaymentRequest {
    /// Build a request for the given plan.
    pub fn new(plan_name: impl Into<String>, card: CardDetails) -> Self {
        Self {
            plan_name: plan_name.into(),
            card,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
