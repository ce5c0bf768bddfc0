// storefront/src/state.rs
use crate::config::AppConfig;
use cartsync::CartRegistry;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub carts: Arc<CartRegistry>,
  pub config: Arc<AppConfig>, // Share loaded config
}
