// storefront/src/services/payment_intent.rs

//! Local stand-in for the hosted "create payment intent" function. No
//! payment provider is contacted; the intent is minted in-process.

use crate::errors::{AppError, Result as AppResult};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
  pub id: String,
  pub client_secret: String,
  pub amount: i64,
  pub currency: String,
  pub status: String, // "requires_payment_method" until a provider confirms it
}

#[instrument(skip(metadata))]
pub async fn create_payment_intent(amount: i64, currency: &str, metadata: Value) -> AppResult<PaymentIntent> {
  if amount <= 0 {
    return Err(AppError::Payment("Amount must be greater than zero".to_string()));
  }

  let millis = Utc::now().timestamp_millis();
  let intent_id = format!("pi_{}", millis);
  let secret_suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
  info!(%intent_id, ?metadata, "Created payment intent.");

  Ok(PaymentIntent {
    client_secret: format!("{}_secret_{}", intent_id, secret_suffix),
    id: intent_id,
    amount,
    currency: currency.to_string(),
    status: "requires_payment_method".to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test]
  async fn intent_carries_amount_and_currency() {
    let intent = create_payment_intent(2550, "usd", json!({"items": []})).await.unwrap();
    assert!(intent.id.starts_with("pi_"));
    assert!(intent.client_secret.starts_with(&format!("{}_secret_", intent.id)));
    assert_eq!(intent.amount, 2550);
    assert_eq!(intent.currency, "usd");
    assert_eq!(intent.status, "requires_payment_method");
  }

  #[tokio::test]
  async fn zero_amount_is_rejected() {
    let err = create_payment_intent(0, "usd", Value::Null).await.unwrap_err();
    assert!(matches!(err, AppError::Payment(_)));
  }
}
