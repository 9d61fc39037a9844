//! Error types for parsing and validating core values.

use thiserror::Error;

use crate::payment::PaymentField;

/// A tier identifier did not match any catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown subscription tier: {0}")]
pub struct ParseTierError(pub String);

/// A feature identifier is not part of the closed feature set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown feature: {0}")]
pub struct ParseFeatureError(pub String);

/// One or more payment form fields failed validation.
///
/// All violations are collected so the form can report them together.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid payment details: {}", describe(.violations))]
pub struct PaymentValidationError {
    /// Offending fields with a human-readable reason each.
    pub violations: Vec<(PaymentField, String)>,
}

impl PaymentValidationError {
    /// Whether the given field is among the violations.
    pub fn has(&self, field: PaymentField) -> bool {
        self.violations.iter().any(|(f, _)| *f == field)
    }
}

fn describe(violations: &[(PaymentField, String)]) -> String {
    violations
        .iter()
        .map(|(field, reason)| format!("{field}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
