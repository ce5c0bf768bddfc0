// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use cartsync::ProductId;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::catalog::{self, ProductFilter};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub category: Option<String>,
  pub search: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let filter = ProductFilter::new(query_params.category.as_deref(), query_params.search.as_deref());
  let products = catalog::list_products(&app_state.db_pool, &filter).await?;
  info!("Fetched {} products.", products.len());

  Ok(HttpResponse::Ok().json(json!({
      "message": "Products fetched successfully.",
      "products": products
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<ProductId>,
) -> Result<HttpResponse, AppError> {
  let product = catalog::get_product(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Product fetched successfully.",
      "inStock": product.in_stock(),
      "product": product
  })))
}
