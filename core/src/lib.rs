// src/lib.rs

//! cartsync: a shopping-cart synchronizer for Rust.
//!
//! cartsync keeps an in-memory list of cart lines for the signed-in identity
//! consistent with a remote table of `(identity, product, quantity)` rows:
//!  - Add merges into an existing line for the same product, or inserts one.
//!  - Every mutation is a remote write followed by a full reload.
//!  - Clear empties the local list directly once the remote delete succeeds.
//!  - Totals are derived from the in-memory list on every access.
//!  - Mutations for one cart are serialized, so concurrent adds compound.
//!  - Failures come back as a typed `CartError` and leave the list as it was.

pub mod error;
pub mod identity;
pub mod memory;
pub mod model;
pub mod registry;
pub mod service;
pub mod state;
pub mod store;
pub mod totals;

// --- Re-exports for the Public API ---

pub use crate::error::{CartError, CartResult};
pub use crate::identity::{FixedIdentity, IdentityProvider, Session};
pub use crate::memory::MemoryCartStore;
pub use crate::model::{
  format_cents, CartLine, IdentityId, LineId, NewCartLine, Product, ProductId, ProductSnapshot, QuantityChange,
};
pub use crate::registry::CartRegistry;
pub use crate::service::CartService;
pub use crate::state::{CartSnapshot, SharedState};
pub use crate::store::CartStore;
pub use crate::totals::CartTotals;

/*
    Typical use:
    1. Implement `CartStore` for your backend (or use `MemoryCartStore`).
    2. Build a `CartService` with the store and an `IdentityProvider`
       (a `Session` on a client, a `FixedIdentity` per user on a server,
       or let `CartRegistry` hand them out).
    3. Call `add` / `update_quantity` / `adjust_quantity` / `remove` / `clear`
       and read `lines()` and `totals()` afterwards.
*/
