//! # byklab-access
//!
//! Navigation decisions for the BYKLAB client.
//!
//! - [`guard`]: [`AccessGuard`] turns the live session and a required feature
//!   into a [`GuardOutcome`]
//! - [`routes`]: the [`RouteTable`] of public and protected destinations and
//!   the [`Navigator`] that applies the guard to them

#![deny(unsafe_code)]

pub mod guard;
pub mod routes;

pub use guard::{AccessGuard, GuardConfig, GuardOutcome, UpgradePrompt, decide};
pub use routes::{Access, Navigator, Route, RouteTable};
