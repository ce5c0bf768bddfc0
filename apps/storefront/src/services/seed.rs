// storefront/src/services/seed.rs

//! Demo catalog inserted at startup when `SEED_DB=true` and the products
//! table is empty.

use sqlx::PgPool;
use tracing::{info, instrument};

use super::catalog;
use crate::errors::Result as AppResult;
use crate::models::NewProduct;

fn demo_catalog() -> Vec<NewProduct> {
  let item = |name: &str, description: &str, price_cents: i64, stock: i32, category: &str| NewProduct {
    name: name.to_string(),
    description: description.to_string(),
    price_cents,
    stock,
    category: category.to_string(),
    images: Vec::new(),
  };
  vec![
    item("Canvas Tote", "Heavy cotton tote bag.", 1800, 40, "accessories"),
    item("Wool Beanie", "Ribbed merino beanie.", 2400, 25, "accessories"),
    item("Field Jacket", "Waxed cotton field jacket.", 12900, 8, "outerwear"),
    item("Linen Shirt", "Relaxed fit linen shirt.", 5500, 15, "shirts"),
    item("Oxford Shirt", "Button-down oxford cloth shirt.", 4900, 0, "shirts"),
  ]
}

/// Returns the number of products inserted (zero when the catalog already has rows).
#[instrument(skip(pool))]
pub async fn seed_catalog(pool: &PgPool) -> AppResult<usize> {
  if catalog::count_products(pool).await? > 0 {
    info!("Catalog already populated; skipping seed.");
    return Ok(0);
  }

  let products = demo_catalog();
  for product in &products {
    catalog::create_product(pool, product).await?;
  }
  info!(count = products.len(), "Seeded demo catalog.");
  Ok(products.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn demo_catalog_passes_validation() {
    for product in demo_catalog() {
      assert!(product.validate().is_ok(), "{} should validate", product.name);
    }
  }
}
