//! # byklab-core
//!
//! Foundation types for the BYKLAB client:
//!
//! - [`Tier`]: subscription levels in catalog order
//! - [`Feature`]: the closed set of gated capabilities
//! - [`Identity`]: the authenticated user as returned by signup/login
//! - [`entitlements`]: the authoritative `(tier, feature)` policy table
//! - [`plans`]: the subscription plan catalog
//! - [`payment`]: demo payment form validation
//! - [`logging`]: `tracing` subscriber setup
//!
//! Everything in this crate is pure data and pure functions. Session state
//! lives in `byklab-auth`; navigation decisions live in `byklab-access`.

#![deny(unsafe_code)]

pub mod entitlements;
pub mod errors;
pub mod feature;
pub mod identity;
pub mod logging;
pub mod payment;
pub mod plans;
pub mod tier;

pub use entitlements::{check, check_identity, check_named, granted_features, minimum_tier};
pub use errors::{ParseFeatureError, ParseTierError, PaymentValidationError};
pub use feature::Feature;
pub use identity::{Identity, UserId};
pub use payment::{CardDetails, PaymentField, PaymentRequest};
pub use plans::{Plan, PlanCatalog};
pub use tier::Tier;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
