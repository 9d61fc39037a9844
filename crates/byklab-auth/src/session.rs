//! Session manager.
//!
//! Owns the single live session for the process and is its only writer.
//! Every mutation is write-through: the store is updated first and the live
//! state only changes once the store has accepted the new record. A failed
//! persist therefore leaves both sides at the last confirmed mutation.
//!
//! The manager does no network I/O. Callers talk to the backend first and
//! hand the authoritative result to [`SessionManager::login`] or
//! [`SessionManager::upgrade_tier`].

use std::sync::Arc;

use byklab_core::{Feature, Identity, Tier, entitlements};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::errors::AuthError;
use crate::storage::SessionStore;

/// A consistent view of the session at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// True until [`SessionManager::restore`] has completed.
    pub loading: bool,
    /// The live identity, if any.
    pub identity: Option<Identity>,
}

#[derive(Debug)]
struct SessionState {
    loading: bool,
    identity: Option<Identity>,
    /// Bumped by every confirmed mutation.
    generation: u64,
}

/// Owner of the live session.
///
/// Share it with `Arc`; all methods take `&self`.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// New manager in the loading state with no identity.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState {
                loading: true,
                identity: None,
                generation: 0,
            }),
        }
    }

    /// Adopt the persisted identity, if any, and leave the loading state.
    ///
    /// The store is read without holding the lock, so concurrent readers keep
    /// seeing `loading == true` until the restored identity and the cleared
    /// flag are installed together. A mutation that lands while the store is
    /// being read wins over the stale record. Once loading has cleared this
    /// only returns the live identity.
    pub fn restore(&self) -> Option<Identity> {
        let started = {
            let state = self.state.read();
            if !state.loading {
                return state.identity.clone();
            }
            state.generation
        };

        let restored = self.store.read();

        let mut state = self.state.write();
        if !state.loading {
            return state.identity.clone();
        }
        state.loading = false;
        if state.generation != started {
            debug!("session changed during restore, keeping live state");
            return state.identity.clone();
        }
        state.identity.clone_from(&restored);

        match &restored {
            Some(identity) => {
                info!(user = %identity.id, tier = %identity.tier, "session restored");
            }
            None => debug!("no stored session"),
        }
        restored
    }

    /// Replace the live session with `identity` and persist it.
    pub fn login(&self, identity: Identity) -> Result<(), AuthError> {
        let mut state = self.state.write();
        self.store.persist(&identity)?;
        info!(user = %identity.id, tier = %identity.tier, "logged in");
        state.identity = Some(identity);
        state.generation += 1;
        Ok(())
    }

    /// Clear the live session and the stored record. Idempotent.
    pub fn logout(&self) -> Result<(), AuthError> {
        let mut state = self.state.write();
        self.store.clear()?;
        state.generation += 1;
        if let Some(previous) = state.identity.take() {
            info!(user = %previous.id, "logged out");
        }
        Ok(())
    }

    /// Replace the tier of the live identity and persist the result.
    ///
    /// Returns the updated identity. Without a live session this is a no-op
    /// that returns [`AuthError::NoActiveSession`].
    pub fn upgrade_tier(&self, tier: Tier) -> Result<Identity, AuthError> {
        let mut state = self.state.write();
        let Some(current) = state.identity.as_ref() else {
            warn!(%tier, "tier upgrade requested without an active session");
            return Err(AuthError::NoActiveSession);
        };

        let updated = current.with_tier(tier);
        self.store.persist(&updated)?;
        info!(user = %updated.id, from = %current.tier, to = %tier, "tier changed");
        state.identity = Some(updated.clone());
        state.generation += 1;
        Ok(updated)
    }

    /// Owned copy of the live identity.
    ///
    /// Later mutations never change a snapshot already handed out.
    pub fn current_identity(&self) -> Option<Identity> {
        self.state.read().identity.clone()
    }

    /// Loading flag and identity read under one lock.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            loading: state.loading,
            identity: state.identity.clone(),
        }
    }

    /// Whether restoration is still pending.
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Whether an identity is live.
    pub fn is_authenticated(&self) -> bool {
        self.state.read().identity.is_some()
    }

    /// Entitlement of the live identity. No identity denies.
    pub fn has_access(&self, feature: Feature) -> bool {
        entitlements::check_identity(self.state.read().identity.as_ref(), feature)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
