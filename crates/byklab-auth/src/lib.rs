//! # byklab-auth
//!
//! Session persistence and the session manager.
//!
//! - [`storage`]: the [`SessionStore`] contract with file and in-memory
//!   implementations
//! - [`session`]: [`SessionManager`], the only writer of the live session
//!
//! The live session is an owned value. Create one [`SessionManager`] at
//! startup, wrap it in an `Arc`, and hand it to whoever needs it.

#![deny(unsafe_code)]

pub mod errors;
pub mod session;
pub mod storage;

pub use errors::AuthError;
pub use session::{SessionManager, SessionSnapshot};
pub use storage::{DEFAULT_STORAGE_KEY, FileSessionStore, MemorySessionStore, SessionStore};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
