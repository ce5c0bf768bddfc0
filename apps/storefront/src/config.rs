// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,

  // Currency passed to the payment-intent stub and stored on orders.
  pub payment_currency: String,

  // Optional: insert a small demo catalog on startup when the table is empty
  pub seed_db: bool,

  // Idle in-memory carts kept before the least recently used are dropped
  pub cart_cache_capacity: usize,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the
  /// process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let db_max_connections = get_env("DB_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?;

    let payment_currency = get_env("PAYMENT_CURRENCY")
      .unwrap_or_else(|_| "usd".to_string())
      .to_lowercase();
    if payment_currency.len() != 3 || !payment_currency.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(AppError::Config(format!(
        "Invalid PAYMENT_CURRENCY '{}': expected a three-letter code",
        payment_currency
      )));
    }

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    let cart_cache_capacity = get_env("CART_CACHE_CAPACITY")
      .unwrap_or_else(|_| cartsync::registry::DEFAULT_CAPACITY.to_string())
      .parse::<usize>()
      .map_err(|e| AppError::Config(format!("Invalid CART_CACHE_CAPACITY: {}", e)))?;
    if cart_cache_capacity == 0 {
      return Err(AppError::Config("CART_CACHE_CAPACITY must be at least 1".to_string()));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      payment_currency,
      seed_db,
      cart_cache_capacity,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_only_database_url_is_set() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/shop")])).unwrap();
    assert_eq!(cfg.server_host, "127.0.0.1");
    assert_eq!(cfg.server_port, 8080);
    assert_eq!(cfg.db_max_connections, 5);
    assert_eq!(cfg.payment_currency, "usd");
    assert!(!cfg.seed_db);
    assert_eq!(cfg.cart_cache_capacity, 10_000);
  }

  #[test]
  fn missing_database_url_is_a_config_error() {
    let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("DATABASE_URL")));
  }

  #[test]
  fn invalid_values_are_rejected() {
    let bad_port = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("SERVER_PORT", "eighty")]));
    assert!(matches!(bad_port, Err(AppError::Config(_))));

    let bad_currency = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("PAYMENT_CURRENCY", "dollars")]));
    assert!(matches!(bad_currency, Err(AppError::Config(_))));

    let zero_capacity = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("CART_CACHE_CAPACITY", "0")]));
    assert!(matches!(zero_capacity, Err(AppError::Config(_))));
  }

  #[test]
  fn currency_is_normalized_to_lowercase() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("PAYMENT_CURRENCY", "EUR")])).unwrap();
    assert_eq!(cfg.payment_currency, "eur");
  }
}
