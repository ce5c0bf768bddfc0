// storefront/src/services/orders.rs

use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewOrder, Order, OrderStatus};

const ORDER_COLUMNS: &str =
  "id, user_id, total_cents, currency, status, shipping_info, items, payment_intent_id, created_at";

#[instrument(skip(pool, order), fields(user_id = %order.user_id, total_cents = order.total_cents))]
pub async fn insert_order(pool: &PgPool, order: &NewOrder) -> AppResult<Order> {
  let created: Order = sqlx::query_as(&format!(
    "INSERT INTO orders (id, user_id, total_cents, currency, status, shipping_info, items, payment_intent_id) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
    ORDER_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(order.user_id)
  .bind(order.total_cents)
  .bind(&order.currency)
  .bind(OrderStatus::Pending)
  .bind(Json(&order.shipping_info))
  .bind(Json(&order.items))
  .bind(&order.payment_intent_id)
  .fetch_one(pool)
  .await?;

  info!(order_id = %created.id, "Order recorded.");
  Ok(created)
}

/// All orders, newest first. Admin view.
#[instrument(skip(pool))]
pub async fn list_orders(pool: &PgPool) -> AppResult<Vec<Order>> {
  let orders = sqlx::query_as(&format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLUMNS))
    .fetch_all(pool)
    .await?;
  Ok(orders)
}

#[instrument(skip(pool))]
pub async fn update_order_status(pool: &PgPool, order_id: Uuid, status: OrderStatus) -> AppResult<Order> {
  let updated: Option<Order> = sqlx::query_as(&format!(
    "UPDATE orders SET status = $1 WHERE id = $2 RETURNING {}",
    ORDER_COLUMNS
  ))
  .bind(status)
  .bind(order_id)
  .fetch_optional(pool)
  .await?;

  updated.ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found.", order_id)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
  pub total_orders: i64,
  pub total_revenue_cents: i64,
}

impl OrderStats {
  /// Folds per-status `(status, count, revenue)` rows. Revenue is the sum
  /// over every order, whatever its status.
  pub fn from_status_totals(rows: &[(OrderStatus, i64, i64)]) -> Self {
    rows.iter().fold(
      OrderStats {
        total_orders: 0,
        total_revenue_cents: 0,
      },
      |acc, (_, count, revenue)| OrderStats {
        total_orders: acc.total_orders + count,
        total_revenue_cents: acc.total_revenue_cents.saturating_add(*revenue),
      },
    )
  }
}

pub async fn order_stats(pool: &PgPool) -> AppResult<OrderStats> {
  let rows: Vec<(OrderStatus, i64, i64)> =
    sqlx::query_as("SELECT status, COUNT(*), COALESCE(SUM(total_cents), 0)::BIGINT FROM orders GROUP BY status")
      .fetch_all(pool)
      .await?;

  Ok(OrderStats::from_status_totals(&rows))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn revenue_counts_orders_of_every_status() {
    let stats = OrderStats::from_status_totals(&[
      (OrderStatus::Pending, 2, 3000),
      (OrderStatus::Delivered, 1, 1250),
      (OrderStatus::Cancelled, 1, 999),
    ]);
    assert_eq!(stats.total_orders, 4);
    assert_eq!(stats.total_revenue_cents, 5249);
  }

  #[test]
  fn no_orders_means_no_revenue() {
    let stats = OrderStats::from_status_totals(&[]);
    assert_eq!(stats.total_orders, 0);
    assert_eq!(stats.total_revenue_cents, 0);
  }
}
