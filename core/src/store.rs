// cartsync/src/store.rs

//! Defines the `CartStore` trait: the remote table of cart rows the
//! synchronizer reads from and writes to.

use crate::error::CartResult;
use crate::model::{CartLine, IdentityId, LineId, NewCartLine};
use async_trait::async_trait;

/// The remote "cart lines" table, abstracted from any particular backend.
///
/// Writes that address a single row are scoped to the owning identity so one
/// identity can never touch another's lines. A write that matches no row
/// must return `CartError::LineNotFound`; any other backend failure is
/// reported as `CartError::Store`.
#[async_trait]
pub trait CartStore: Send + Sync {
  /// All rows owned by `identity`, each joined with its product snapshot.
  async fn fetch_lines(&self, identity: IdentityId) -> CartResult<Vec<CartLine>>;

  async fn insert_line(&self, line: NewCartLine) -> CartResult<()>;

  async fn update_quantity(&self, identity: IdentityId, line_id: LineId, quantity: i32) -> CartResult<()>;

  async fn delete_line(&self, identity: IdentityId, line_id: LineId) -> CartResult<()>;

  /// Deletes every row owned by `identity` and returns how many went away.
  async fn delete_lines_for(&self, identity: IdentityId) -> CartResult<u64>;
}
