// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use super::extractors::AuthenticatedUser;
use crate::checkout::{run_checkout, CheckoutRequest};
use crate::errors::AppError;
use crate::state::AppState;

#[instrument(
    name = "handler::start_checkout",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequest>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let receipt = run_checkout(&app_state, auth_user.identity(), req_payload.into_inner()).await?;
  info!(order_id = %receipt.order.id, "Checkout succeeded.");

  Ok(HttpResponse::Created().json(json!({
      "message": "Order placed successfully.",
      "order": receipt.order,
      "paymentIntent": receipt.payment_intent,
      "cartCleared": receipt.cart_cleared
  })))
}
