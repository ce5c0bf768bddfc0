// cartsync/src/identity.rs

//! Where the synchronizer learns who is signed in.

use crate::model::IdentityId;
use crate::state::SharedState;
use tracing::info;

/// Accessor for the currently authenticated identity, if any.
pub trait IdentityProvider: Send + Sync {
  fn current_identity(&self) -> Option<IdentityId>;
}

/// A sign-in/sign-out holder for a single client session.
#[derive(Debug, Clone, Default)]
pub struct Session {
  identity: SharedState<Option<IdentityId>>,
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn signed_in(identity: IdentityId) -> Self {
    Self {
      identity: SharedState::new(Some(identity)),
    }
  }

  pub fn sign_in(&self, identity: IdentityId) {
    info!(%identity, "Session signed in.");
    *self.identity.write() = Some(identity);
  }

  pub fn sign_out(&self) {
    let previous = self.identity.write().take();
    if let Some(identity) = previous {
      info!(%identity, "Session signed out.");
    }
  }
}

impl IdentityProvider for Session {
  fn current_identity(&self) -> Option<IdentityId> {
    *self.identity.read()
  }
}

/// Always reports the same identity. Server-side carts are keyed per request
/// identity, so each one gets a fixed provider.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(pub IdentityId);

impl IdentityProvider for FixedIdentity {
  fn current_identity(&self) -> Option<IdentityId> {
    Some(self.0)
  }
}
