// storefront/src/models/order.rs

use cartsync::CartLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Shipped,
  Delivered,
  Cancelled,
}

/// Where the order goes. Every field but `country` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
  pub name: String,
  pub address: String,
  pub city: String,
  pub postal_code: String,
  #[serde(default = "default_country")]
  pub country: String,
}

fn default_country() -> String {
  "United States".to_string()
}

impl ShippingInfo {
  pub fn validate(&self) -> Result<(), AppError> {
    let missing: Vec<&str> = [
      ("name", &self.name),
      ("address", &self.address),
      ("city", &self.city),
      ("postalCode", &self.postal_code),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if missing.is_empty() {
      Ok(())
    } else {
      Err(AppError::Validation(format!(
        "Please fill in all shipping information (missing: {}).",
        missing.join(", ")
      )))
    }
  }
}

/// Frozen copy of a cart line at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub product_id: Uuid,
  pub product_name: String,
  pub quantity: i32,
  pub price_cents: i64,
}

impl From<&CartLine> for OrderItem {
  fn from(line: &CartLine) -> Self {
    OrderItem {
      product_id: line.product_id.as_uuid(),
      product_name: line.product.name.clone(),
      quantity: line.quantity,
      price_cents: line.product.price_cents,
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total_cents: i64,
  pub currency: String,
  pub status: OrderStatus,
  pub shipping_info: Json<ShippingInfo>,
  pub items: Json<Vec<OrderItem>>,
  pub payment_intent_id: String,
  pub created_at: DateTime<Utc>,
}

/// Insert payload assembled by checkout.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub user_id: Uuid,
  pub total_cents: i64,
  pub currency: String,
  pub shipping_info: ShippingInfo,
  pub items: Vec<OrderItem>,
  pub payment_intent_id: String,
}
