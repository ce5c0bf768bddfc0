// storefront/src/services/cart_store.rs

//! Postgres-backed `CartStore` over the `cart_items` table.

use async_trait::async_trait;
use cartsync::{CartError, CartLine, CartResult, CartStore, IdentityId, LineId, NewCartLine, ProductId};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::models::CartLineRow;

const FETCH_LINES_SQL: &str = r#"
  SELECT ci.id, ci.user_id, ci.product_id, ci.quantity, ci.created_at,
         p.name AS product_name, p.price_cents AS product_price_cents, p.images AS product_images
  FROM cart_items ci
  JOIN products p ON p.id = ci.product_id
  WHERE ci.user_id = $1
  ORDER BY ci.created_at ASC, ci.id ASC
"#;

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// A foreign-key violation on insert means the product row is gone; anything
/// else is a store failure.
fn insert_error(product_id: ProductId, err: sqlx::Error) -> CartError {
  let missing_product = err
    .as_database_error()
    .and_then(|db| db.code())
    .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);
  if missing_product {
    CartError::ProductNotFound { product_id }
  } else {
    CartError::store("insert_line", err)
  }
}

#[derive(Clone)]
pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  #[instrument(name = "pg_cart_store::fetch_lines", skip(self))]
  async fn fetch_lines(&self, identity: IdentityId) -> CartResult<Vec<CartLine>> {
    let rows: Vec<CartLineRow> = sqlx::query_as(FETCH_LINES_SQL)
      .bind(identity.as_uuid())
      .fetch_all(&self.pool)
      .await
      .map_err(|e| CartError::store("fetch_lines", e))?;
    debug!(rows = rows.len(), "Fetched cart rows.");
    Ok(rows.into_iter().map(CartLine::from).collect())
  }

  #[instrument(name = "pg_cart_store::insert_line", skip(self))]
  async fn insert_line(&self, line: NewCartLine) -> CartResult<()> {
    sqlx::query("INSERT INTO cart_items (id, user_id, product_id, quantity) VALUES ($1, $2, $3, $4)")
      .bind(Uuid::new_v4())
      .bind(line.identity_id.as_uuid())
      .bind(line.product_id.as_uuid())
      .bind(line.quantity)
      .execute(&self.pool)
      .await
      .map_err(|e| insert_error(line.product_id, e))?;
    Ok(())
  }

  #[instrument(name = "pg_cart_store::update_quantity", skip(self))]
  async fn update_quantity(&self, identity: IdentityId, line_id: LineId, quantity: i32) -> CartResult<()> {
    let result = sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2 AND user_id = $3")
      .bind(quantity)
      .bind(line_id.as_uuid())
      .bind(identity.as_uuid())
      .execute(&self.pool)
      .await
      .map_err(|e| CartError::store("update_quantity", e))?;
    if result.rows_affected() == 0 {
      return Err(CartError::LineNotFound { line_id });
    }
    Ok(())
  }

  #[instrument(name = "pg_cart_store::delete_line", skip(self))]
  async fn delete_line(&self, identity: IdentityId, line_id: LineId) -> CartResult<()> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
      .bind(line_id.as_uuid())
      .bind(identity.as_uuid())
      .execute(&self.pool)
      .await
      .map_err(|e| CartError::store("delete_line", e))?;
    if result.rows_affected() == 0 {
      return Err(CartError::LineNotFound { line_id });
    }
    Ok(())
  }

  #[instrument(name = "pg_cart_store::delete_lines_for", skip(self))]
  async fn delete_lines_for(&self, identity: IdentityId) -> CartResult<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
      .bind(identity.as_uuid())
      .execute(&self.pool)
      .await
      .map_err(|e| CartError::store("delete_lines_for", e))?;
    Ok(result.rows_affected())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn non_constraint_insert_failures_stay_retryable() {
    let err = insert_error(ProductId::new_v4(), sqlx::Error::PoolTimedOut);
    assert!(matches!(err, CartError::Store { operation: "insert_line", .. }));
    assert!(err.is_retryable());
  }
}
