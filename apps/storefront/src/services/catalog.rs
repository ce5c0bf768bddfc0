// storefront/src/services/catalog.rs

//! Product catalog reads and admin writes.

use cartsync::{Product, ProductId};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewProduct, ProductRow};

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock, category, images, created_at";

/// Narrowing applied to the catalog listing. Empty strings and the `all`
/// category mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
  pub category: Option<String>,
  pub search: Option<String>,
}

impl ProductFilter {
  pub fn new(category: Option<&str>, search: Option<&str>) -> Self {
    let clean = |value: Option<&str>| value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
    Self {
      category: clean(category).filter(|c| !c.eq_ignore_ascii_case("all")),
      search: clean(search),
    }
  }

  /// `ILIKE` pattern matching `search` anywhere in the name, with the
  /// pattern metacharacters escaped.
  fn name_pattern(&self) -> Option<String> {
    self.search.as_deref().map(|search| {
      let mut escaped = String::with_capacity(search.len() + 2);
      escaped.push('%');
      for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
          escaped.push('\\');
        }
        escaped.push(c);
      }
      escaped.push('%');
      escaped
    })
  }
}

/// Lists the catalog newest first, narrowed by category and a
/// case-insensitive name search.
#[instrument(skip(pool))]
pub async fn list_products(pool: &PgPool, filter: &ProductFilter) -> AppResult<Vec<Product>> {
  let rows: Vec<ProductRow> = sqlx::query_as(&format!(
    "SELECT {} FROM products \
     WHERE ($1::TEXT IS NULL OR category = $1) \
       AND ($2::TEXT IS NULL OR name ILIKE $2 ESCAPE '\\') \
     ORDER BY created_at DESC",
    PRODUCT_COLUMNS
  ))
  .bind(filter.category.as_deref())
  .bind(filter.name_pattern())
  .fetch_all(pool)
  .await?;
  Ok(rows.into_iter().map(Product::from).collect())
}

/// Rejects products that cannot be put in a cart right now.
pub fn ensure_purchasable(product: &Product) -> AppResult<()> {
  if product.in_stock() {
    Ok(())
  } else {
    warn!(product_id = %product.id, "Rejected add of out-of-stock product.");
    Err(AppError::Validation(format!("{} is out of stock.", product.name)))
  }
}

#[instrument(skip(pool))]
pub async fn get_product(pool: &PgPool, product_id: ProductId) -> AppResult<Product> {
  let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
    .bind(product_id.as_uuid())
    .fetch_optional(pool)
    .await?;

  row.map(Product::from).ok_or_else(|| {
    warn!("Product not found.");
    AppError::NotFound(format!("Product with ID {} not found.", product_id))
  })
}

#[instrument(skip(pool, new_product), fields(name = %new_product.name))]
pub async fn create_product(pool: &PgPool, new_product: &NewProduct) -> AppResult<Product> {
  new_product.validate()?;

  let row: ProductRow = sqlx::query_as(&format!(
    "INSERT INTO products (id, name, description, price_cents, stock, category, images) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
    PRODUCT_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(&new_product.name)
  .bind(&new_product.description)
  .bind(new_product.price_cents)
  .bind(new_product.stock)
  .bind(&new_product.category)
  .bind(&new_product.images)
  .fetch_one(pool)
  .await?;

  info!(product_id = %row.id, "Product created.");
  Ok(row.into())
}

/// Deletes a product. Cart rows pointing at it cascade away with it.
#[instrument(skip(pool))]
pub async fn delete_product(pool: &PgPool, product_id: ProductId) -> AppResult<()> {
  let result = sqlx::query("DELETE FROM products WHERE id = $1")
    .bind(product_id.as_uuid())
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }
  info!("Product deleted.");
  Ok(())
}

pub async fn count_products(pool: &PgPool) -> AppResult<i64> {
  let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
  Ok(count)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn product(stock: i32) -> Product {
    Product {
      id: ProductId::new_v4(),
      name: "Field Jacket".to_string(),
      description: String::new(),
      price_cents: 12900,
      stock,
      category: "outerwear".to_string(),
      images: vec![],
      created_at: Utc::now(),
    }
  }

  #[test]
  fn blank_and_all_filters_are_dropped() {
    assert_eq!(ProductFilter::new(Some("All"), Some("   ")), ProductFilter::default());
    assert_eq!(ProductFilter::new(None, None), ProductFilter::default());
  }

  #[test]
  fn category_and_search_combine() {
    let filter = ProductFilter::new(Some("shirts"), Some(" Linen "));
    assert_eq!(filter.category.as_deref(), Some("shirts"));
    assert_eq!(filter.name_pattern().as_deref(), Some("%Linen%"));
  }

  #[test]
  fn search_wildcards_are_escaped() {
    let filter = ProductFilter::new(None, Some("100%_off\\"));
    assert_eq!(filter.name_pattern().as_deref(), Some("%100\\%\\_off\\\\%"));
  }

  #[test]
  fn out_of_stock_products_are_not_purchasable() {
    assert!(ensure_purchasable(&product(3)).is_ok());
    assert!(matches!(ensure_purchasable(&product(0)), Err(AppError::Validation(_))));
  }
}
