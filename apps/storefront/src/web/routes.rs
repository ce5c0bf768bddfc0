// storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{admin_handlers, cart_handlers, checkout_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      // Cart routes act for the identity in the X-User-ID header.
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{line_id}", web::patch().to(cart_handlers::set_quantity_handler))
          .route("/items/{line_id}", web::delete().to(cart_handlers::remove_from_cart_handler))
          .route("/items/{line_id}/adjust", web::post().to(cart_handlers::adjust_quantity_handler))
          .route("/signout", web::post().to(cart_handlers::sign_out_handler)),
      )
      .service(web::scope("/checkout").route("", web::post().to(checkout_handlers::start_checkout_handler)))
      .service(
        web::scope("/admin")
          .route("/stats", web::get().to(admin_handlers::stats_handler))
          .route("/products", web::post().to(admin_handlers::create_product_handler))
          .route("/products/{product_id}", web::delete().to(admin_handlers::delete_product_handler))
          .route("/orders", web::get().to(admin_handlers::list_orders_handler))
          .route("/orders/{order_id}/status", web::patch().to(admin_handlers::update_order_status_handler)),
      ),
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{http::StatusCode, test, App};

  #[actix_rt::test]
  async fn health_route_responds_ok() {
    let app = test::init_service(App::new().configure(configure_app_routes)).await;
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
