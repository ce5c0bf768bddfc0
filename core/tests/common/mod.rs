// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use cartsync::{CartService, IdentityId, MemoryCartStore, Product, ProductId, Session};
use chrono::Utc;
use std::sync::Arc;
use tracing::Level;

// --- Catalog fixtures ---

pub fn product(name: &str, price_cents: i64) -> Product {
  Product {
    id: ProductId::new_v4(),
    name: name.to_string(),
    description: format!("{} description", name),
    price_cents,
    stock: 10,
    category: "general".to_string(),
    images: vec![format!("{}.jpg", name.to_lowercase())],
    created_at: Utc::now(),
  }
}

/// A signed-in cart over a memory store holding a 10.00 and a 5.50 product.
pub struct Fixture {
  pub store: Arc<MemoryCartStore>,
  pub session: Arc<Session>,
  pub cart: CartService,
  pub identity: IdentityId,
  pub ten: Product,
  pub five_fifty: Product,
}

impl Fixture {
  pub fn new() -> Self {
    let ten = product("Notebook", 1000);
    let five_fifty = product("Pen", 550);
    let store = Arc::new(MemoryCartStore::with_products([ten.clone(), five_fifty.clone()]));
    let identity = IdentityId::new_v4();
    let session = Arc::new(Session::signed_in(identity));
    let cart = CartService::new(store.clone(), session.clone());
    Self {
      store,
      session,
      cart,
      identity,
      ten,
      five_fifty,
    }
  }

  /// Another cart view over the same store and session, as a second device would have.
  pub fn second_view(&self) -> CartService {
    CartService::new(self.store.clone(), self.session.clone())
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
