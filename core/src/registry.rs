// cartsync/src/registry.rs

//! Defines `CartRegistry`, an identity-keyed registry of cart services.
//!
//! A server handles many identities at once; each gets exactly one
//! `CartService` so that all of that identity's mutations share one
//! mutation gate and one in-memory list.
//!
//! An entry is only ever dropped while the registry holds the sole reference
//! to it. While any caller still holds the `Arc` from `cart_for`, the entry
//! stays and later `cart_for` calls hand out that same service, so there is
//! never more than one live gate per identity.

use crate::identity::FixedIdentity;
use crate::model::IdentityId;
use crate::service::CartService;
use crate::store::CartStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

/// Default bound on cached carts.
pub const DEFAULT_CAPACITY: usize = 10_000;

struct Entry {
  cart: Arc<CartService>,
  last_used: u64,
}

impl Entry {
  fn is_idle(&self) -> bool {
    Arc::strong_count(&self.cart) == 1
  }
}

#[derive(Default)]
struct Carts {
  entries: HashMap<IdentityId, Entry>,
  clock: u64,
}

pub struct CartRegistry {
  store: Arc<dyn CartStore>,
  capacity: usize,
  carts: Mutex<Carts>,
}

impl CartRegistry {
  pub fn new(store: Arc<dyn CartStore>) -> Self {
    Self::with_capacity(store, DEFAULT_CAPACITY)
  }

  /// Keeps at most `capacity` idle carts cached. Carts that are in use are
  /// never dropped, so the map can briefly exceed the bound by the number of
  /// in-flight requests.
  pub fn with_capacity(store: Arc<dyn CartStore>, capacity: usize) -> Self {
    Self {
      store,
      capacity: capacity.max(1),
      carts: Mutex::new(Carts::default()),
    }
  }

  /// Returns the cart for `identity`, creating it on first use. A freshly
  /// created cart is empty until its first operation loads it.
  pub fn cart_for(&self, identity: IdentityId) -> Arc<CartService> {
    let mut carts = self.carts.lock();
    carts.clock += 1;
    let now = carts.clock;

    if let Some(entry) = carts.entries.get_mut(&identity) {
      entry.last_used = now;
      return entry.cart.clone();
    }

    if carts.entries.len() >= self.capacity {
      Self::shed_idle(&mut carts, self.capacity - 1);
    }

    event!(Level::DEBUG, %identity, "Creating cart service for identity.");
    let cart = Arc::new(CartService::new(self.store.clone(), Arc::new(FixedIdentity(identity))));
    carts.entries.insert(
      identity,
      Entry {
        cart: cart.clone(),
        last_used: now,
      },
    );
    cart
  }

  /// Drops the in-memory cart for `identity` (sign-out). Remote rows are left
  /// alone and will be loaded again on the next operation.
  ///
  /// An idle cart is removed outright. A cart still in use by another caller
  /// stays registered and is reset once its in-flight mutation finishes.
  /// Returns whether a cart was cached.
  pub async fn evict(&self, identity: IdentityId) -> bool {
    let busy = {
      let mut carts = self.carts.lock();
      let idle = match carts.entries.get(&identity) {
        None => return false,
        Some(entry) => entry.is_idle(),
      };
      if idle {
        carts.entries.remove(&identity);
        None
      } else {
        carts.entries.get(&identity).map(|entry| entry.cart.clone())
      }
    };

    match busy {
      None => event!(Level::INFO, %identity, "Evicted in-memory cart."),
      Some(cart) => {
        cart.reset().await;
        event!(Level::INFO, %identity, "Reset in-memory cart still in use.");
      }
    }
    true
  }

  pub fn len(&self) -> usize {
    self.carts.lock().entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.carts.lock().entries.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn store(&self) -> Arc<dyn CartStore> {
    self.store.clone()
  }

  /// Removes least recently used idle entries until at most `target` remain.
  fn shed_idle(carts: &mut Carts, target: usize) {
    let excess = carts.entries.len().saturating_sub(target);
    if excess == 0 {
      return;
    }
    let mut idle: Vec<(u64, IdentityId)> = carts
      .entries
      .iter()
      .filter(|(_, entry)| entry.is_idle())
      .map(|(identity, entry)| (entry.last_used, *identity))
      .collect();
    idle.sort_unstable();

    let shed = idle.len().min(excess);
    for (_, identity) in idle.into_iter().take(shed) {
      carts.entries.remove(&identity);
    }
    event!(Level::DEBUG, shed, remaining = carts.entries.len(), "Shed idle carts.");
  }
}
