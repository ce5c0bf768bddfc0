// storefront/src/main.rs

mod checkout;
mod config;
mod errors;
mod models;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::services::{seed, PgCartStore};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use cartsync::CartRegistry;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // RUST_LOG override
    .with_span_events(FmtSpan::CLOSE);
  // LOG_FORMAT=json for log shippers; human-readable otherwise.
  if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
    subscriber.json().init();
  } else {
    subscriber.init();
  }

  tracing::info!("Starting storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let db_pool = match PgPoolOptions::new()
    .max_connections(app_config.db_max_connections)
    .connect(&app_config.database_url)
    .await
  {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string()));
    }
  };

  if app_config.seed_db {
    if let Err(e) = seed::seed_catalog(&db_pool).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  let carts = Arc::new(CartRegistry::with_capacity(
    Arc::new(PgCartStore::new(db_pool.clone())),
    app_config.cart_cache_capacity,
  ));

  let app_state = AppState {
    db_pool,
    carts,
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
