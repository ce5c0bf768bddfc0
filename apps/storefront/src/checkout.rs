// storefront/src/checkout.rs

//! Checkout flow: shipping check, cart snapshot, payment intent, pending
//! order, cart clear. Each step logs under the `checkout` span.

use cartsync::{CartLine, CartTotals, IdentityId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewOrder, Order, OrderItem, ShippingInfo};
use crate::services::{create_payment_intent, orders, PaymentIntent};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  pub shipping_info: ShippingInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
  pub order: Order,
  pub payment_intent: PaymentIntent,
  pub cart_cleared: bool,
}

/// Freezes the cart into order items and a total. An empty cart cannot be
/// checked out.
pub fn summarize_cart(lines: &[CartLine]) -> AppResult<(Vec<OrderItem>, CartTotals)> {
  if lines.is_empty() {
    return Err(AppError::Validation("Your cart is empty.".to_string()));
  }
  let items = lines.iter().map(OrderItem::from).collect();
  Ok((items, CartTotals::of(lines)))
}

#[instrument(name = "checkout", skip(app_state, identity, request), fields(%identity))]
pub async fn run_checkout(
  app_state: &AppState,
  identity: IdentityId,
  request: CheckoutRequest,
) -> AppResult<CheckoutReceipt> {
  request.shipping_info.validate().map_err(|e| {
    warn!(error = %e, "Rejected checkout: incomplete shipping info.");
    e
  })?;

  let cart = app_state.carts.cart_for(identity);
  let currency = app_state.config.payment_currency.clone();

  // Snapshot, order and clear happen under one hold of the cart's gate, so
  // an add racing the checkout either lands in the order or stays in the cart.
  let ((order, payment_intent), cart_cleared) = cart
    .checkout_with(|lines| async move {
      let (items, totals) = summarize_cart(&lines)?;
      info!(items = totals.items, total_cents = totals.price_cents, "Cart snapshot taken.");

      let payment_intent = create_payment_intent(
        totals.price_cents,
        &currency,
        json!({ "items": &items, "shippingInfo": &request.shipping_info }),
      )
      .await?;

      let order = orders::insert_order(
        &app_state.db_pool,
        &NewOrder {
          user_id: identity.as_uuid(),
          total_cents: totals.price_cents,
          currency,
          shipping_info: request.shipping_info,
          items,
          payment_intent_id: payment_intent.id.clone(),
        },
      )
      .await?;
      Ok::<_, AppError>((order, payment_intent))
    })
    .await?;

  // The order is committed at this point; a failed clear is logged inside
  // the cart and must not turn into an error the client would retry.
  info!(order_id = %order.id, cart_cleared, "Checkout complete.");

  Ok(CheckoutReceipt {
    order,
    payment_intent,
    cart_cleared,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use cartsync::{LineId, ProductId, ProductSnapshot};
  use chrono::Utc;

  fn line(name: &str, price_cents: i64, quantity: i32) -> CartLine {
    let product_id = ProductId::new_v4();
    CartLine {
      id: LineId::new_v4(),
      identity_id: IdentityId::new_v4(),
      product_id,
      quantity,
      product: ProductSnapshot {
        id: product_id,
        name: name.to_string(),
        price_cents,
        images: vec![],
      },
      created_at: Utc::now(),
    }
  }

  #[test]
  fn empty_cart_cannot_check_out() {
    assert!(matches!(summarize_cart(&[]), Err(AppError::Validation(_))));
  }

  #[test]
  fn summary_freezes_names_prices_and_total() {
    let lines = vec![line("Tote", 1000, 2), line("Beanie", 550, 1)];
    let (items, totals) = summarize_cart(&lines).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_name, "Tote");
    assert_eq!(items[0].price_cents, 1000);
    assert_eq!(items[1].quantity, 1);
    assert_eq!(totals.price_cents, 2550);
    assert_eq!(totals.items, 3);
  }

  #[test]
  fn request_parses_camel_case_shipping() {
    let request: CheckoutRequest = serde_json::from_str(
      r#"{"shippingInfo":{"name":"Ada","address":"1 Loop Rd","city":"Springfield","postalCode":"12345"}}"#,
    )
    .unwrap();
    assert_eq!(request.shipping_info.postal_code, "12345");
    assert!(request.shipping_info.validate().is_ok());
  }
}
