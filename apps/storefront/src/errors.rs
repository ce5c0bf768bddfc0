// storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use cartsync::CartError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Payment Processing Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Cart Error: {source}")]
  Cart {
    #[from]
    source: CartError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience in handlers
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => match err.downcast::<CartError>() {
        Ok(cart_err) => AppError::Cart { source: cart_err },
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

impl AppError {
  fn status_and_body(&self) -> (actix_web::http::StatusCode, serde_json::Value) {
    use actix_web::http::StatusCode;
    match self {
      AppError::Validation(m) => (StatusCode::BAD_REQUEST, json!({"error": m})),
      AppError::Auth(m) => (StatusCode::UNAUTHORIZED, json!({"error": m})),
      AppError::Forbidden(m) => (StatusCode::FORBIDDEN, json!({"error": m})),
      AppError::NotFound(m) => (StatusCode::NOT_FOUND, json!({"error": m})),
      AppError::Payment(m) => (StatusCode::PAYMENT_REQUIRED, json!({"error": m})),
      AppError::Config(m) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "Configuration issue", "detail": m}),
      ),
      AppError::Sqlx(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "Database operation failed"}),
      ),
      AppError::Cart { source } => match source {
        CartError::NoIdentity => (
          StatusCode::UNAUTHORIZED,
          json!({"error": source.to_string(), "kind": "no_identity"}),
        ),
        CartError::InvalidQuantity { quantity } => (
          StatusCode::BAD_REQUEST,
          json!({"error": source.to_string(), "kind": "invalid_quantity", "quantity": quantity}),
        ),
        CartError::LineNotFound { line_id } => (
          StatusCode::NOT_FOUND,
          json!({"error": source.to_string(), "kind": "line_not_found", "lineId": line_id}),
        ),
        CartError::ProductNotFound { product_id } => (
          StatusCode::NOT_FOUND,
          json!({"error": source.to_string(), "kind": "product_not_found", "productId": product_id}),
        ),
        CartError::Store { operation, .. } => (
          StatusCode::BAD_GATEWAY,
          json!({"error": "Cart store unavailable, please retry", "kind": "store", "operation": operation}),
        ),
      },
      AppError::Internal(m) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "An internal error occurred", "detail": m}),
      ),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> actix_web::http::StatusCode {
    self.status_and_body().0
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    let (status, body) = self.status_and_body();
    HttpResponse::build(status).json(body)
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::StatusCode;
  use cartsync::{LineId, ProductId};

  #[test]
  fn cart_errors_map_to_distinct_statuses() {
    let cases = [
      (CartError::NoIdentity, StatusCode::UNAUTHORIZED),
      (CartError::InvalidQuantity { quantity: 0 }, StatusCode::BAD_REQUEST),
      (
        CartError::LineNotFound {
          line_id: LineId::new_v4(),
        },
        StatusCode::NOT_FOUND,
      ),
      (
        CartError::ProductNotFound {
          product_id: ProductId::new_v4(),
        },
        StatusCode::NOT_FOUND,
      ),
      (
        CartError::store("fetch_lines", anyhow::anyhow!("connection reset")),
        StatusCode::BAD_GATEWAY,
      ),
    ];
    for (cart_err, expected) in cases {
      assert_eq!(AppError::from(cart_err).status_code(), expected);
    }
  }

  #[test]
  fn anyhow_wrapping_cart_error_keeps_kind() {
    let wrapped = anyhow::Error::new(CartError::NoIdentity);
    let app_err = AppError::from(wrapped);
    assert!(matches!(app_err, AppError::Cart { source: CartError::NoIdentity }));
  }
}
