// storefront/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use cartsync::ProductId;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use super::extractors::AdminUser;
use crate::errors::AppError;
use crate::models::{NewProduct, OrderStatus};
use crate::services::{catalog, orders, profiles};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct UpdateOrderStatusPayload {
  pub status: OrderStatus,
}

#[instrument(name = "handler::admin_stats", skip(app_state, admin), fields(admin_id = %admin.user_id))]
pub async fn stats_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let pool = &app_state.db_pool;
  let (products, order_stats, users) = futures_util::try_join!(
    catalog::count_products(pool),
    orders::order_stats(pool),
    profiles::count_users(pool),
  )?;

  Ok(HttpResponse::Ok().json(json!({
      "totalProducts": products,
      "totalOrders": order_stats.total_orders,
      "totalUsers": users,
      "totalRevenueCents": order_stats.total_revenue_cents,
  })))
}

#[instrument(name = "handler::admin_create_product", skip(app_state, admin, req_payload), fields(admin_id = %admin.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  req_payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let product = catalog::create_product(&app_state.db_pool, &req_payload).await?;
  Ok(HttpResponse::Created().json(json!({ "product": product })))
}

#[instrument(
    name = "handler::admin_delete_product",
    skip(app_state, admin, path),
    fields(admin_id = %admin.user_id, product_id = %path.as_ref())
)]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<ProductId>,
) -> Result<HttpResponse, AppError> {
  catalog::delete_product(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::admin_list_orders", skip(app_state, admin), fields(admin_id = %admin.user_id))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let orders = orders::list_orders(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(
    name = "handler::admin_update_order_status",
    skip(app_state, admin, path, req_payload),
    fields(admin_id = %admin.user_id, order_id = %path.as_ref(), status = ?req_payload.status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateOrderStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order = orders::update_order_status(&app_state.db_pool, path.into_inner(), req_payload.status).await?;
  info!("Order status updated.");
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}
