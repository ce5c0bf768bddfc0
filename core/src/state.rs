// cartsync/src/state.rs
use crate::model::{CartLine, IdentityId};
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, interior-mutable state handle backed by `parking_lot::RwLock`.
///
/// IMPORTANT: guards obtained from this struct are blocking and MUST NOT
/// be held across `.await` suspension points.
#[derive(Debug)]
pub struct SharedState<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> SharedState<T> {
  pub fn new(data: T) -> Self {
    SharedState(Arc::new(RwLock::new(data)))
  }

  /// The returned guard MUST be dropped before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  /// The returned guard MUST be dropped before any `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.0.try_read()
  }

  // e.g. state.map_read(|snapshot| &snapshot.lines)
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&T) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }
}

impl<T: Send + Sync + 'static> Clone for SharedState<T> {
  fn clone(&self) -> Self {
    SharedState(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for SharedState<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}

/// The in-memory view of one identity's cart.
///
/// `lines` is only ever replaced wholesale by a successful reload, or emptied
/// by a clear / identity change.
#[derive(Debug, Clone, Default)]
pub struct CartSnapshot {
  /// Identity the lines were fetched for. `None` until the first sync.
  pub owner: Option<IdentityId>,
  pub lines: Vec<CartLine>,
  pub loading: bool,
}

impl CartSnapshot {
  pub fn line(&self, line_id: crate::model::LineId) -> Option<&CartLine> {
    self.lines.iter().find(|line| line.id == line_id)
  }

  pub fn line_for_product(&self, product_id: crate::model::ProductId) -> Option<&CartLine> {
    self.lines.iter().find(|line| line.product_id == product_id)
  }
}
