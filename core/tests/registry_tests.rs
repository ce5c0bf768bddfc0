// tests/registry_tests.rs
mod common;

use cartsync::{CartRegistry, IdentityId, MemoryCartStore};
use common::*;
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_registry_hands_out_one_cart_per_identity() {
  setup_tracing();
  let registry = CartRegistry::new(Arc::new(MemoryCartStore::new()));
  let alice = IdentityId::new_v4();
  let bob = IdentityId::new_v4();

  let first = registry.cart_for(alice);
  let again = registry.cart_for(alice);
  let other = registry.cart_for(bob);

  assert!(Arc::ptr_eq(&first, &again));
  assert!(!Arc::ptr_eq(&first, &other));
  assert_eq!(registry.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_registry_carts_are_isolated() {
  setup_tracing();
  let mug = product("Mug", 800);
  let registry = CartRegistry::new(Arc::new(MemoryCartStore::with_products([mug.clone()])));
  let alice = IdentityId::new_v4();
  let bob = IdentityId::new_v4();

  registry.cart_for(alice).add(mug.id, 2).await.unwrap();
  registry.cart_for(bob).add(mug.id, 5).await.unwrap();

  assert_eq!(registry.cart_for(alice).total_items(), 2);
  assert_eq!(registry.cart_for(bob).total_items(), 5);
  assert_eq!(registry.cart_for(bob).total_price_cents(), 4000);
}

#[tokio::test]
#[serial]
async fn test_evict_drops_memory_and_reloads_on_next_use() {
  setup_tracing();
  let mug = product("Mug", 800);
  let store = Arc::new(MemoryCartStore::with_products([mug.clone()]));
  let registry = CartRegistry::new(store.clone());
  let alice = IdentityId::new_v4();
  registry.cart_for(alice).add(mug.id, 3).await.unwrap();

  assert!(registry.evict(alice).await);
  assert!(!registry.evict(alice).await);
  assert!(registry.is_empty());
  assert_eq!(store.row_count(alice), 1);

  let fresh = registry.cart_for(alice);
  assert!(fresh.lines().is_empty());
  fresh.reload().await.unwrap();
  assert_eq!(fresh.total_items(), 3);
}

#[tokio::test]
#[serial]
async fn test_registry_sheds_least_recently_used_idle_carts() {
  setup_tracing();
  let registry = CartRegistry::with_capacity(Arc::new(MemoryCartStore::new()), 100);
  let regular = IdentityId::new_v4();
  let cached = Arc::downgrade(&registry.cart_for(regular));

  for i in 0..10_000 {
    registry.cart_for(IdentityId::new_v4());
    if i % 50 == 0 {
      // Keep one identity recently used so it survives shedding.
      registry.cart_for(regular);
    }
  }

  assert!(registry.len() <= registry.capacity());
  // Only the registry holds the cart, so it is still alive only if it was kept.
  assert!(cached.upgrade().is_some(), "recently used cart should stay cached");
}

#[tokio::test]
#[serial]
async fn test_registry_never_sheds_carts_in_use() {
  setup_tracing();
  let registry = CartRegistry::with_capacity(Arc::new(MemoryCartStore::new()), 2);
  let held: Vec<_> = (0..3).map(|_| registry.cart_for(IdentityId::new_v4())).collect();

  // All three are held by callers, so none can be dropped.
  assert_eq!(registry.len(), 3);

  drop(held);
  registry.cart_for(IdentityId::new_v4());
  assert!(registry.len() <= 2);
}
