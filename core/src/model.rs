// cartsync/src/model.rs

//! Plain data carried between the store, the synchronizer and its callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(pub Uuid);

    impl $name {
      pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
      }

      pub fn as_uuid(&self) -> Uuid {
        self.0
      }
    }

    impl From<Uuid> for $name {
      fn from(id: Uuid) -> Self {
        Self(id)
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }
  };
}

uuid_id!(
  /// The authenticated user/session a cart belongs to.
  IdentityId
);
uuid_id!(
  /// Primary key of a product row.
  ProductId
);
uuid_id!(
  /// Primary key of a cart line row.
  LineId
);

/// The product fields joined onto every cart line when it is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
  pub id: ProductId,
  pub name: String,
  pub price_cents: i64,
  pub images: Vec<String>,
}

/// One distinct product inside an identity's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
  pub id: LineId,
  pub identity_id: IdentityId,
  pub product_id: ProductId,
  pub quantity: i32,
  pub product: ProductSnapshot,
  pub created_at: DateTime<Utc>,
}

impl CartLine {
  /// Unit price times quantity, saturating at `i64::MAX`.
  pub fn line_total_cents(&self) -> i64 {
    self.product.price_cents.saturating_mul(i64::from(self.quantity))
  }
}

/// Row payload for a first add-to-cart of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartLine {
  pub identity_id: IdentityId,
  pub product_id: ProductId,
  pub quantity: i32,
}

/// A catalog entry. The synchronizer never writes these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub description: String,
  pub price_cents: i64,
  pub stock: i32,
  pub category: String,
  pub images: Vec<String>,
  pub created_at: DateTime<Utc>,
}

impl Product {
  pub fn snapshot(&self) -> ProductSnapshot {
    ProductSnapshot {
      id: self.id,
      name: self.name.clone(),
      price_cents: self.price_cents,
      images: self.images.clone(),
    }
  }

  pub fn in_stock(&self) -> bool {
    self.stock > 0
  }
}

/// What `CartService::adjust_quantity` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuantityChange {
  Updated { quantity: i32 },
  Removed,
}

/// Formats integer cents as a dollar amount, e.g. `2550` -> `"$25.50"`.
pub fn format_cents(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.unsigned_abs();
  format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn format_cents_pads_fraction() {
    assert_eq!(format_cents(2550), "$25.50");
    assert_eq!(format_cents(5), "$0.05");
    assert_eq!(format_cents(0), "$0.00");
    assert_eq!(format_cents(-120), "-$1.20");
  }

  #[test]
  fn line_total_multiplies_unit_price() {
    let product_id = ProductId::new_v4();
    let line = CartLine {
      id: LineId::new_v4(),
      identity_id: IdentityId::new_v4(),
      product_id,
      quantity: 3,
      product: ProductSnapshot {
        id: product_id,
        name: "Mug".to_string(),
        price_cents: 1299,
        images: vec![],
      },
      created_at: Utc::now(),
    };
    assert_eq!(line.line_total_cents(), 3897);
  }

  #[test]
  fn huge_totals_saturate_instead_of_overflowing() {
    let product_id = ProductId::new_v4();
    let line = CartLine {
      id: LineId::new_v4(),
      identity_id: IdentityId::new_v4(),
      product_id,
      quantity: i32::MAX,
      product: ProductSnapshot {
        id: product_id,
        name: "Yacht".to_string(),
        price_cents: i64::MAX / 2,
        images: vec![],
      },
      created_at: Utc::now(),
    };
    assert_eq!(line.line_total_cents(), i64::MAX);

    let lines = vec![line.clone(), line];
    assert_eq!(crate::totals::total_price_cents(&lines), i64::MAX);
  }
}
