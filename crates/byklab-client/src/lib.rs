//! # byklab-client
//!
//! Backend access for the BYKLAB client.
//!
//! - [`backend`]: [`BackendClient`], a `reqwest` client for the auth,
//!   plan catalog and payment activation endpoints
//! - [`checkout`]: [`Checkout`], plan selection and the purchase sequence
//!   that upgrades the live session
//!
//! Network calls happen here and never inside the session manager; their
//! results are handed to `byklab_auth::SessionManager` mutations.

#![deny(unsafe_code)]

pub mod backend;
pub mod checkout;
pub mod errors;

pub use backend::{Activation, BackendClient};
pub use checkout::{Checkout, PlanSelection, Purchase};
pub use errors::{ClientError, Result};
