// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use cartsync::{format_cents, CartService, LineId, ProductId};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

use super::extractors::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::catalog;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequestPayload {
  pub product_id: ProductId,
  #[serde(default = "one")]
  pub quantity: i32,
}

fn one() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct SetQuantityPayload {
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct AdjustQuantityPayload {
  pub delta: i32,
}

fn cart_body(cart: &CartService) -> serde_json::Value {
  let snapshot = cart.snapshot();
  let totals = cart.totals();
  json!({
      "items": snapshot.lines,
      "totalItems": totals.items,
      "totalPriceCents": totals.price_cents,
      "totalPrice": format_cents(totals.price_cents),
      "loading": snapshot.loading,
  })
}

fn cart_for(app_state: &AppState, user: &AuthenticatedUser) -> Arc<CartService> {
  app_state.carts.cart_for(user.identity())
}

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_for(&app_state, &auth_user);
  cart.reload().await?;
  Ok(HttpResponse::Ok().json(cart_body(&cart)))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %req_payload.product_id, quantity = req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product = catalog::get_product(&app_state.db_pool, req_payload.product_id).await?;
  catalog::ensure_purchasable(&product)?;

  let cart = cart_for(&app_state, &auth_user);
  cart.add(req_payload.product_id, req_payload.quantity).await?;
  info!("Item added to cart.");
  Ok(HttpResponse::Ok().json(cart_body(&cart)))
}

#[instrument(
    name = "handler::set_quantity",
    skip(app_state, path, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, line_id = %path.as_ref(), quantity = req_payload.quantity)
)]
pub async fn set_quantity_handler(
  app_state: web::Data<AppState>,
  path: web::Path<LineId>,
  req_payload: web::Json<SetQuantityPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_for(&app_state, &auth_user);
  cart.update_quantity(path.into_inner(), req_payload.quantity).await?;
  Ok(HttpResponse::Ok().json(cart_body(&cart)))
}

#[instrument(
    name = "handler::adjust_quantity",
    skip(app_state, path, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, line_id = %path.as_ref(), delta = req_payload.delta)
)]
pub async fn adjust_quantity_handler(
  app_state: web::Data<AppState>,
  path: web::Path<LineId>,
  req_payload: web::Json<AdjustQuantityPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_for(&app_state, &auth_user);
  let change = cart.adjust_quantity(path.into_inner(), req_payload.delta).await?;
  let mut body = cart_body(&cart);
  body["change"] = json!(change);
  Ok(HttpResponse::Ok().json(body))
}

#[instrument(
    name = "handler::remove_from_cart",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, line_id = %path.as_ref())
)]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<LineId>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_for(&app_state, &auth_user);
  cart.remove(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(cart_body(&cart)))
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_for(&app_state, &auth_user);
  let removed = cart.clear().await?;
  info!(removed, "Cart cleared.");
  Ok(HttpResponse::Ok().json(cart_body(&cart)))
}

/// Drops the in-memory cart for the caller. Remote rows stay put, so the
/// next request for this identity loads them again.
#[instrument(name = "handler::sign_out", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn sign_out_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let evicted = app_state.carts.evict(auth_user.identity()).await;
  Ok(HttpResponse::Ok().json(json!({ "signedOut": true, "evicted": evicted })))
}
