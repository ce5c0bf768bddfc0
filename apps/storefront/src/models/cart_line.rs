// storefront/src/models/cart_line.rs

use cartsync::{CartLine, IdentityId, LineId, ProductId, ProductSnapshot};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One `cart_items` row joined with the product columns the cart shows.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub created_at: DateTime<Utc>,
  pub product_name: String,
  pub product_price_cents: i64,
  pub product_images: Vec<String>,
}

impl From<CartLineRow> for CartLine {
  fn from(row: CartLineRow) -> Self {
    CartLine {
      id: LineId(row.id),
      identity_id: IdentityId(row.user_id),
      product_id: ProductId(row.product_id),
      quantity: row.quantity,
      product: ProductSnapshot {
        id: ProductId(row.product_id),
        name: row.product_name,
        price_cents: row.product_price_cents,
        images: row.product_images,
      },
      created_at: row.created_at,
    }
  }
}
