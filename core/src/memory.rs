// cartsync/src/memory.rs

//! An in-process `CartStore`.
//!
//! Rows and products live behind a `parking_lot::Mutex`. Like the hosted
//! table it stands in for, it has no uniqueness constraint on
//! (identity, product); keeping one line per product is the synchronizer's
//! job. Failures and latency can be injected to exercise the synchronizer's
//! error and ordering behaviour.

use crate::error::{CartError, CartResult};
use crate::model::{CartLine, IdentityId, LineId, NewCartLine, Product, ProductId};
use crate::store::CartStore;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone)]
struct Row {
  id: LineId,
  identity_id: IdentityId,
  product_id: ProductId,
  quantity: i32,
  created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
  products: HashMap<ProductId, Product>,
  // Insertion order doubles as the fetch order.
  rows: Vec<Row>,
}

#[derive(Debug, Default)]
pub struct MemoryCartStore {
  tables: Mutex<Tables>,
  fail_reads: AtomicBool,
  fail_writes: AtomicBool,
  latency: Mutex<Option<Duration>>,
  reads: AtomicUsize,
  writes: AtomicUsize,
}

impl MemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
    let store = Self::new();
    for product in products {
      store.put_product(product);
    }
    store
  }

  pub fn put_product(&self, product: Product) {
    self.tables.lock().products.insert(product.id, product);
  }

  /// Makes every following fetch fail until switched off.
  pub fn fail_reads(&self, fail: bool) {
    self.fail_reads.store(fail, Ordering::SeqCst);
  }

  /// Makes every following write fail until switched off.
  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  /// Delays every call, to let concurrent callers interleave.
  pub fn set_latency(&self, latency: Option<Duration>) {
    *self.latency.lock() = latency;
  }

  pub fn read_count(&self) -> usize {
    self.reads.load(Ordering::SeqCst)
  }

  pub fn write_count(&self) -> usize {
    self.writes.load(Ordering::SeqCst)
  }

  /// Raw row count for `identity`, bypassing the product join.
  pub fn row_count(&self, identity: IdentityId) -> usize {
    self.tables.lock().rows.iter().filter(|r| r.identity_id == identity).count()
  }

  /// Number of rows `identity` holds for `product_id`.
  pub fn rows_for_product(&self, identity: IdentityId, product_id: ProductId) -> usize {
    self
      .tables
      .lock()
      .rows
      .iter()
      .filter(|r| r.identity_id == identity && r.product_id == product_id)
      .count()
  }

  async fn simulate_latency(&self) {
    let latency = *self.latency.lock();
    if let Some(latency) = latency {
      tokio::time::sleep(latency).await;
    }
  }

  async fn begin_read(&self, operation: &'static str) -> CartResult<()> {
    self.simulate_latency().await;
    self.reads.fetch_add(1, Ordering::SeqCst);
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(CartError::store(operation, anyhow!("simulated read failure")));
    }
    Ok(())
  }

  async fn begin_write(&self, operation: &'static str) -> CartResult<()> {
    self.simulate_latency().await;
    self.writes.fetch_add(1, Ordering::SeqCst);
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(CartError::store(operation, anyhow!("simulated write failure")));
    }
    Ok(())
  }
}

#[async_trait]
impl CartStore for MemoryCartStore {
  async fn fetch_lines(&self, identity: IdentityId) -> CartResult<Vec<CartLine>> {
    self.begin_read("fetch_lines").await?;
    let tables = self.tables.lock();
    let lines = tables
      .rows
      .iter()
      .filter(|row| row.identity_id == identity)
      .filter_map(|row| {
        // Inner-join semantics: a row whose product vanished is not returned.
        let product = tables.products.get(&row.product_id)?;
        Some(CartLine {
          id: row.id,
          identity_id: row.identity_id,
          product_id: row.product_id,
          quantity: row.quantity,
          product: product.snapshot(),
          created_at: row.created_at,
        })
      })
      .collect();
    Ok(lines)
  }

  async fn insert_line(&self, line: NewCartLine) -> CartResult<()> {
    self.begin_write("insert_line").await?;
    let mut tables = self.tables.lock();
    if !tables.products.contains_key(&line.product_id) {
      return Err(CartError::ProductNotFound {
        product_id: line.product_id,
      });
    }
    let id = LineId::new_v4();
    trace!(%id, identity = %line.identity_id, product = %line.product_id, "memory store insert");
    tables.rows.push(Row {
      id,
      identity_id: line.identity_id,
      product_id: line.product_id,
      quantity: line.quantity,
      created_at: Utc::now(),
    });
    Ok(())
  }

  async fn update_quantity(&self, identity: IdentityId, line_id: LineId, quantity: i32) -> CartResult<()> {
    self.begin_write("update_quantity").await?;
    let mut tables = self.tables.lock();
    let row = tables
      .rows
      .iter_mut()
      .find(|row| row.id == line_id && row.identity_id == identity)
      .ok_or(CartError::LineNotFound { line_id })?;
    row.quantity = quantity;
    Ok(())
  }

  async fn delete_line(&self, identity: IdentityId, line_id: LineId) -> CartResult<()> {
    self.begin_write("delete_line").await?;
    let mut tables = self.tables.lock();
    let before = tables.rows.len();
    tables.rows.retain(|row| !(row.id == line_id && row.identity_id == identity));
    if tables.rows.len() == before {
      return Err(CartError::LineNotFound { line_id });
    }
    Ok(())
  }

  async fn delete_lines_for(&self, identity: IdentityId) -> CartResult<u64> {
    self.begin_write("delete_lines_for").await?;
    let mut tables = self.tables.lock();
    let before = tables.rows.len();
    tables.rows.retain(|row| row.identity_id != identity);
    Ok((before - tables.rows.len()) as u64)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn product(price_cents: i64) -> Product {
    Product {
      id: ProductId::new_v4(),
      name: "Widget".to_string(),
      description: String::new(),
      price_cents,
      stock: 5,
      category: "tools".to_string(),
      images: vec!["widget.png".to_string()],
      created_at: Utc::now(),
    }
  }

  #[tokio::test]
  async fn fetch_joins_product_snapshot_and_filters_by_identity() {
    let widget = product(250);
    let store = MemoryCartStore::with_products([widget.clone()]);
    let alice = IdentityId::new_v4();
    let bob = IdentityId::new_v4();

    store
      .insert_line(NewCartLine { identity_id: alice, product_id: widget.id, quantity: 2 })
      .await
      .unwrap();
    store
      .insert_line(NewCartLine { identity_id: bob, product_id: widget.id, quantity: 7 })
      .await
      .unwrap();

    let lines = store.fetch_lines(alice).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].product, widget.snapshot());
  }

  #[tokio::test]
  async fn scoped_writes_do_not_cross_identities() {
    let widget = product(100);
    let store = MemoryCartStore::with_products([widget.clone()]);
    let alice = IdentityId::new_v4();
    let bob = IdentityId::new_v4();
    store
      .insert_line(NewCartLine { identity_id: alice, product_id: widget.id, quantity: 1 })
      .await
      .unwrap();
    let line_id = store.fetch_lines(alice).await.unwrap()[0].id;

    let err = store.delete_line(bob, line_id).await.unwrap_err();
    assert!(matches!(err, CartError::LineNotFound { .. }));
    assert_eq!(store.row_count(alice), 1);
  }

  #[tokio::test]
  async fn insert_of_unknown_product_is_not_retryable() {
    let store = MemoryCartStore::new();
    let missing = ProductId::new_v4();
    let err = store
      .insert_line(NewCartLine {
        identity_id: IdentityId::new_v4(),
        product_id: missing,
        quantity: 1,
      })
      .await
      .unwrap_err();
    assert!(matches!(err, CartError::ProductNotFound { product_id } if product_id == missing));
    assert!(!err.is_retryable());
  }
}
