// tests/identity_tests.rs
mod common;

use cartsync::{CartError, IdentityId};
use common::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_sync_identity_loads_existing_remote_lines() {
  setup_tracing();
  let fx = Fixture::new();
  fx.cart.add(fx.ten.id, 2).await.unwrap();

  // A second view of the same identity starts empty and picks the rows up on sync.
  let other = fx.second_view();
  assert!(other.lines().is_empty());
  assert_eq!(other.owner(), None);

  let identity = other.sync_identity().await.unwrap();

  assert_eq!(identity, Some(fx.identity));
  assert_eq!(other.owner(), Some(fx.identity));
  assert_eq!(other.lines(), fx.cart.lines());
}

#[tokio::test]
#[serial]
async fn test_sign_out_clears_memory_but_keeps_remote_rows() {
  setup_tracing();
  let fx = Fixture::new();
  fx.cart.add(fx.ten.id, 1).await.unwrap();
  fx.cart.add(fx.five_fifty.id, 4).await.unwrap();

  fx.session.sign_out();
  let identity = fx.cart.sync_identity().await.unwrap();

  assert_eq!(identity, None);
  assert!(fx.cart.lines().is_empty());
  assert_eq!(fx.cart.total_items(), 0);
  assert_eq!(fx.cart.owner(), None);
  assert_eq!(fx.store.row_count(fx.identity), 2);

  let err = fx.cart.add(fx.ten.id, 1).await.unwrap_err();
  assert!(matches!(err, CartError::NoIdentity));
}

#[tokio::test]
#[serial]
async fn test_sign_in_again_restores_cart() {
  setup_tracing();
  let fx = Fixture::new();
  fx.cart.add(fx.ten.id, 3).await.unwrap();
  let before = fx.cart.lines();

  fx.session.sign_out();
  fx.cart.sync_identity().await.unwrap();
  fx.session.sign_in(fx.identity);
  fx.cart.sync_identity().await.unwrap();

  assert_eq!(fx.cart.lines(), before);
  assert_eq!(fx.cart.total_price_cents(), 3000);
}

#[tokio::test]
#[serial]
async fn test_switching_identity_swaps_carts_without_merging() {
  setup_tracing();
  let fx = Fixture::new();
  fx.cart.add(fx.ten.id, 1).await.unwrap();

  let someone_else = IdentityId::new_v4();
  fx.session.sign_in(someone_else);

  // The next mutation notices the switch, loads the new identity's (empty)
  // cart, and only then applies the add.
  fx.cart.add(fx.five_fifty.id, 2).await.unwrap();

  let lines = fx.cart.lines();
  assert_eq!(fx.cart.owner(), Some(someone_else));
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].product_id, fx.five_fifty.id);
  assert_eq!(lines[0].identity_id, someone_else);
  assert_eq!(fx.store.row_count(fx.identity), 1);
  assert_eq!(fx.store.row_count(someone_else), 1);
}

#[tokio::test]
#[serial]
async fn test_identity_transition_with_failing_store_retries_later() {
  setup_tracing();
  let fx = Fixture::new();
  fx.cart.add(fx.ten.id, 1).await.unwrap();

  let other = fx.second_view();
  fx.store.fail_reads(true);
  let err = other.sync_identity().await.unwrap_err();
  assert!(err.is_retryable());
  assert_eq!(other.owner(), None);
  assert!(other.lines().is_empty());

  fx.store.fail_reads(false);
  other.sync_identity().await.unwrap();
  assert_eq!(other.owner(), Some(fx.identity));
  assert_eq!(other.lines().len(), 1);
}
