// storefront/src/models/product.rs

use cartsync::{Product, ProductId};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price_cents: i64,
  pub stock: i32,
  pub category: String,
  pub images: Vec<String>,
  pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: ProductId(row.id),
      name: row.name,
      description: row.description,
      price_cents: row.price_cents,
      stock: row.stock,
      category: row.category,
      images: row.images,
      created_at: row.created_at,
    }
  }
}

/// Admin payload for creating a catalog entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price_cents: i64,
  pub stock: i32,
  pub category: String,
  #[serde(default)]
  pub images: Vec<String>,
}

impl NewProduct {
  pub fn validate(&self) -> Result<(), AppError> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Product name must not be empty.".to_string()));
    }
    if self.category.trim().is_empty() {
      return Err(AppError::Validation("Product category must not be empty.".to_string()));
    }
    if self.price_cents < 0 {
      return Err(AppError::Validation("Product price must not be negative.".to_string()));
    }
    if self.stock < 0 {
      return Err(AppError::Validation("Product stock must not be negative.".to_string()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_product() -> NewProduct {
    NewProduct {
      name: "Lamp".to_string(),
      description: String::new(),
      price_cents: 4500,
      stock: 3,
      category: "home".to_string(),
      images: vec![],
    }
  }

  #[test]
  fn valid_product_passes() {
    assert!(new_product().validate().is_ok());
  }

  #[test]
  fn negative_price_or_stock_is_rejected() {
    let mut p = new_product();
    p.price_cents = -1;
    assert!(matches!(p.validate(), Err(AppError::Validation(_))));

    let mut p = new_product();
    p.stock = -2;
    assert!(matches!(p.validate(), Err(AppError::Validation(_))));
  }

  #[test]
  fn blank_name_is_rejected() {
    let mut p = new_product();
    p.name = "   ".to_string();
    assert!(matches!(p.validate(), Err(AppError::Validation(_))));
  }
}
