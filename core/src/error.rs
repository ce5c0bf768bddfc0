// cartsync/src/error.rs
use crate::model::{LineId, ProductId};
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Every way a cart operation can fail.
///
/// The variants are deliberately distinct so a caller can tell "nobody is
/// signed in" (prompt for authentication) apart from "the store rejected the
/// write" (offer a retry).
#[derive(Debug, Error)]
pub enum CartError {
  #[error("No authenticated identity; cart operations require a signed-in user")]
  NoIdentity,

  #[error("Invalid quantity {quantity}: cart lines must hold at least one unit")]
  InvalidQuantity { quantity: i64 },

  #[error("Cart line not found: {line_id}")]
  LineNotFound { line_id: LineId },

  #[error("Product not found: {product_id}")]
  ProductNotFound { product_id: ProductId },

  #[error("Cart store failed during '{operation}'. Source: {source}")]
  Store {
    operation: &'static str,
    #[source]
    source: AnyhowError,
  },
}

impl CartError {
  /// Wraps a backend failure for the named store operation.
  pub fn store(operation: &'static str, source: impl Into<AnyhowError>) -> Self {
    CartError::Store {
      operation,
      source: source.into(),
    }
  }

  /// True when retrying the same call could succeed.
  pub fn is_retryable(&self) -> bool {
    matches!(self, CartError::Store { .. })
  }
}

impl From<AnyhowError> for CartError {
  fn from(err: AnyhowError) -> Self {
    // Store implementations sometimes bubble a CartError up through anyhow;
    // keep the original kind instead of burying it under Store.
    match err.downcast::<CartError>() {
      Ok(cart_err) => cart_err,
      Err(err) => CartError::Store {
        operation: "unknown",
        source: err,
      },
    }
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
