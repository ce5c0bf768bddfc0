// cartsync/src/totals.rs

//! Derived cart figures. Always recomputed from the lines handed in; nothing
//! here is cached.

use crate::model::CartLine;
use serde::Serialize;

/// Sum of quantities across all lines.
pub fn total_items(lines: &[CartLine]) -> i64 {
  lines.iter().map(|line| i64::from(line.quantity)).sum()
}

/// Sum of unit price times quantity across all lines, in cents. Saturates
/// instead of overflowing.
pub fn total_price_cents(lines: &[CartLine]) -> i64 {
  lines
    .iter()
    .map(CartLine::line_total_cents)
    .fold(0i64, i64::saturating_add)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
  pub items: i64,
  pub price_cents: i64,
}

impl CartTotals {
  pub fn of(lines: &[CartLine]) -> Self {
    Self {
      items: total_items(lines),
      price_cents: total_price_cents(lines),
    }
  }
}
