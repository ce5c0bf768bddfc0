// cartsync/src/service.rs

//! The cart synchronizer.
//!
//! `CartService` owns the in-memory list of cart lines for the current
//! identity and keeps it in step with a `CartStore`. Every mutation is a
//! remote write followed by a full reload; the list is never patched
//! optimistically. Mutations for one service are queued behind an async
//! mutex, so the "read existing quantity, then write" step of `add` cannot
//! interleave with another mutation and reload responses land in order.

use crate::error::{CartError, CartResult};
use crate::identity::IdentityProvider;
use crate::model::{CartLine, IdentityId, LineId, NewCartLine, ProductId, QuantityChange};
use crate::state::{CartSnapshot, SharedState};
use crate::store::CartStore;
use crate::totals::{self, CartTotals};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, instrument, warn};

pub struct CartService {
  store: Arc<dyn CartStore>,
  identity: Arc<dyn IdentityProvider>,
  state: SharedState<CartState>,
  gate: Mutex<()>,
}

/// Snapshot plus bookkeeping that callers never see.
#[derive(Debug, Default)]
struct CartState {
  snapshot: CartSnapshot,
  /// Set when the last fetch failed, so the list may not reflect a write
  /// that already landed. Cleared by the next successful fetch.
  stale: bool,
}

impl CartService {
  pub fn new(store: Arc<dyn CartStore>, identity: Arc<dyn IdentityProvider>) -> Self {
    Self {
      store,
      identity,
      state: SharedState::new(CartState::default()),
      gate: Mutex::new(()),
    }
  }

  // --- Read side: plain accessors over the in-memory list ---

  pub fn lines(&self) -> Vec<CartLine> {
    self.state.read().snapshot.lines.clone()
  }

  pub fn snapshot(&self) -> CartSnapshot {
    self.state.read().snapshot.clone()
  }

  pub fn is_loading(&self) -> bool {
    self.state.read().snapshot.loading
  }

  /// Identity whose lines are currently held, if any load has succeeded.
  pub fn owner(&self) -> Option<IdentityId> {
    self.state.read().snapshot.owner
  }

  pub fn total_items(&self) -> i64 {
    totals::total_items(&self.state.map_read(|s| s.snapshot.lines.as_slice()))
  }

  pub fn total_price_cents(&self) -> i64 {
    totals::total_price_cents(&self.state.map_read(|s| s.snapshot.lines.as_slice()))
  }

  pub fn totals(&self) -> CartTotals {
    CartTotals::of(&self.state.map_read(|s| s.snapshot.lines.as_slice()))
  }

  // --- Write side ---

  /// Adds one unit of `product_id`.
  pub async fn add_one(&self, product_id: ProductId) -> CartResult<()> {
    self.add(product_id, 1).await
  }

  /// Adds `quantity` units of `product_id`, merging into an existing line for
  /// the same product when there is one.
  #[instrument(name = "cart::add", skip_all, fields(%product_id, quantity = quantity), err(Display))]
  pub async fn add(&self, product_id: ProductId, quantity: i32) -> CartResult<()> {
    if quantity <= 0 {
      warn!("Rejected add-to-cart with non-positive quantity.");
      return Err(CartError::InvalidQuantity {
        quantity: i64::from(quantity),
      });
    }

    let (_gate, identity) = self.begin().await?;

    let existing = {
      let guard = self.state.read();
      guard.snapshot.line_for_product(product_id).map(|line| (line.id, line.quantity))
    };

    match existing {
      Some((line_id, current)) => {
        let merged = current.checked_add(quantity).ok_or(CartError::InvalidQuantity {
          quantity: i64::from(current) + i64::from(quantity),
        })?;
        debug!(%line_id, current, merged, "Product already in cart; merging quantities.");
        self
          .store
          .update_quantity(identity, line_id, merged)
          .await
          .map_err(|e| self.failed("update_quantity", e))?;
      }
      None => {
        debug!("Product not yet in cart; inserting a new line.");
        self
          .store
          .insert_line(NewCartLine {
            identity_id: identity,
            product_id,
            quantity,
          })
          .await
          .map_err(|e| self.failed("insert_line", e))?;
      }
    }

    self.load(identity).await?;
    info!(%identity, "Added product to cart.");
    Ok(())
  }

  /// Overwrites the quantity of a line.
  ///
  /// A non-positive quantity is rejected rather than treated as a removal;
  /// use `remove` or `adjust_quantity` to take a line out of the cart.
  #[instrument(name = "cart::update_quantity", skip_all, fields(%line_id, quantity = quantity), err(Display))]
  pub async fn update_quantity(&self, line_id: LineId, quantity: i32) -> CartResult<()> {
    if quantity <= 0 {
      warn!("Rejected quantity update with non-positive quantity.");
      return Err(CartError::InvalidQuantity {
        quantity: i64::from(quantity),
      });
    }

    let (_gate, identity) = self.begin().await?;
    self
      .store
      .update_quantity(identity, line_id, quantity)
      .await
      .map_err(|e| self.failed("update_quantity", e))?;
    self.load(identity).await?;
    info!(%identity, "Updated cart line quantity.");
    Ok(())
  }

  /// Moves a line's quantity by `delta`. Dropping to zero or below removes
  /// the line.
  #[instrument(name = "cart::adjust_quantity", skip_all, fields(%line_id, delta = delta), err(Display))]
  pub async fn adjust_quantity(&self, line_id: LineId, delta: i32) -> CartResult<QuantityChange> {
    let (_gate, identity) = self.begin().await?;

    let current = {
      let guard = self.state.read();
      guard.snapshot.line(line_id).map(|line| line.quantity)
    }
    .ok_or(CartError::LineNotFound { line_id })?;

    let target = i64::from(current) + i64::from(delta);
    let change = if target <= 0 {
      self
        .store
        .delete_line(identity, line_id)
        .await
        .map_err(|e| self.failed("delete_line", e))?;
      QuantityChange::Removed
    } else {
      let quantity = i32::try_from(target).map_err(|_| CartError::InvalidQuantity { quantity: target })?;
      self
        .store
        .update_quantity(identity, line_id, quantity)
        .await
        .map_err(|e| self.failed("update_quantity", e))?;
      QuantityChange::Updated { quantity }
    };

    self.load(identity).await?;
    info!(%identity, ?change, "Adjusted cart line.");
    Ok(change)
  }

  #[instrument(name = "cart::remove", skip_all, fields(%line_id), err(Display))]
  pub async fn remove(&self, line_id: LineId) -> CartResult<()> {
    let (_gate, identity) = self.begin().await?;
    self
      .store
      .delete_line(identity, line_id)
      .await
      .map_err(|e| self.failed("delete_line", e))?;
    self.load(identity).await?;
    info!(%identity, "Removed line from cart.");
    Ok(())
  }

  /// Deletes every line for the identity. The in-memory list is emptied
  /// directly since the post-state is known; no reload is issued.
  #[instrument(name = "cart::clear", skip(self), err(Display))]
  pub async fn clear(&self) -> CartResult<u64> {
    let (_gate, identity) = self.begin().await?;
    let removed = self
      .store
      .delete_lines_for(identity)
      .await
      .map_err(|e| self.failed("delete_lines_for", e))?;
    {
      let mut guard = self.state.write();
      guard.snapshot.lines.clear();
      guard.stale = false;
    }
    info!(%identity, removed, "Cleared cart.");
    Ok(removed)
  }

  /// Re-fetches the full list for the current identity.
  #[instrument(name = "cart::reload", skip(self), err(Display))]
  pub async fn reload(&self) -> CartResult<()> {
    let _gate = self.gate.lock().await;
    let (identity, loaded) = self.reconcile_identity().await?;
    let identity = identity.ok_or_else(|| self.no_identity())?;
    if !loaded {
      self.load(identity).await?;
    }
    Ok(())
  }

  /// Picks up a sign-in, sign-out or identity switch from the provider.
  /// Returns the identity the cart now belongs to.
  #[instrument(name = "cart::sync_identity", skip(self), err(Display))]
  pub async fn sync_identity(&self) -> CartResult<Option<IdentityId>> {
    let _gate = self.gate.lock().await;
    let (identity, _) = self.reconcile_identity().await?;
    Ok(identity)
  }

  /// Hands a fresh copy of the cart to `place` and, if it succeeds, empties
  /// the cart, all under one hold of the mutation gate. No other mutation of
  /// this cart can land between the snapshot and the clear.
  ///
  /// A failed clear after `place` succeeded is logged and does not undo
  /// `place`'s result; the list is marked stale and the second element of
  /// the returned pair is `false`.
  #[instrument(name = "cart::checkout_with", skip_all, err(Display))]
  pub async fn checkout_with<F, Fut, T, E>(&self, place: F) -> Result<(T, bool), E>
  where
    F: FnOnce(Vec<CartLine>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<CartError> + std::fmt::Display,
  {
    let (_gate, identity) = self.begin().await?;
    self.load(identity).await?;
    let lines = self.lines();

    let placed = place(lines).await?;

    let cleared = match self.store.delete_lines_for(identity).await {
      Ok(removed) => {
        let mut guard = self.state.write();
        guard.snapshot.lines.clear();
        guard.stale = false;
        info!(%identity, removed, "Cart emptied after checkout.");
        true
      }
      Err(e) => {
        error!(%identity, error = %e, "Checkout placed but clearing the cart failed; cart will reload.");
        self.state.write().stale = true;
        false
      }
    };
    Ok((placed, cleared))
  }

  /// Forgets the in-memory list (sign-out). Waits for any in-flight mutation
  /// first, so it never cuts into the middle of one. The next operation
  /// loads the remote rows again.
  #[instrument(name = "cart::reset", skip(self))]
  pub async fn reset(&self) {
    let _gate = self.gate.lock().await;
    let mut guard = self.state.write();
    guard.snapshot = CartSnapshot::default();
    guard.stale = false;
  }

  // --- Internals ---

  /// Takes the mutation gate and resolves the identity to act for, catching
  /// up on identity changes and stale lists first.
  async fn begin(&self) -> CartResult<(MutexGuard<'_, ()>, IdentityId)> {
    let gate = self.gate.lock().await;
    let (identity, loaded) = self.reconcile_identity().await?;
    let identity = identity.ok_or_else(|| self.no_identity())?;

    let stale = self.state.read().stale;
    if stale && !loaded {
      debug!(%identity, "Cart list is stale from an earlier failed fetch; reloading before mutating.");
      self.load(identity).await?;
    }
    Ok((gate, identity))
  }

  /// Must be called with the gate held. Returns the current identity and
  /// whether a fresh load already ran as part of the transition.
  async fn reconcile_identity(&self) -> CartResult<(Option<IdentityId>, bool)> {
    let current = self.identity.current_identity();
    let owner = self.state.read().snapshot.owner;
    if current == owner {
      return Ok((current, false));
    }

    info!(previous = ?owner, current = ?current, "Identity changed; dropping in-memory cart.");
    {
      let mut guard = self.state.write();
      guard.snapshot.owner = None;
      guard.snapshot.lines.clear();
      guard.stale = false;
    }

    match current {
      Some(identity) => {
        self.load(identity).await?;
        Ok((Some(identity), true))
      }
      None => Ok((None, false)),
    }
  }

  /// Fetches all lines for `identity` and swaps them in. On failure the
  /// current list is left as it was and marked stale.
  async fn load(&self, identity: IdentityId) -> CartResult<()> {
    self.state.write().snapshot.loading = true;
    let fetched = self.store.fetch_lines(identity).await;

    let mut guard = self.state.write();
    guard.snapshot.loading = false;
    match fetched {
      Ok(lines) => {
        debug!(%identity, lines = lines.len(), "Cart reloaded.");
        guard.snapshot.lines = lines;
        guard.snapshot.owner = Some(identity);
        guard.stale = false;
        Ok(())
      }
      Err(e) => {
        guard.stale = true;
        drop(guard);
        Err(self.failed("fetch_lines", e))
      }
    }
  }

  fn failed(&self, operation: &'static str, err: CartError) -> CartError {
    match &err {
      CartError::LineNotFound { line_id } => {
        warn!(operation, %line_id, "Cart line no longer exists; keeping last fetched cart.");
      }
      CartError::ProductNotFound { product_id } => {
        warn!(operation, %product_id, "Product does not exist; keeping last fetched cart.");
      }
      other => {
        error!(operation, error = %other, "Cart store operation failed; keeping last fetched cart.");
      }
    }
    err
  }

  fn no_identity(&self) -> CartError {
    warn!("Cart operation attempted without an authenticated identity.");
    CartError::NoIdentity
  }
}

impl std::fmt::Debug for CartService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let guard = self.state.read();
    f.debug_struct("CartService")
      .field("owner", &guard.snapshot.owner)
      .field("lines", &guard.snapshot.lines.len())
      .field("loading", &guard.snapshot.loading)
      .field("stale", &guard.stale)
      .finish()
  }
}
