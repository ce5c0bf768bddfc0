// storefront/src/services/mod.rs

//! Database access and external-service stand-ins used by the handlers.

pub mod cart_store;
pub mod catalog;
pub mod orders;
pub mod payment_intent;
pub mod profiles;
pub mod seed;

pub use cart_store::PgCartStore;
pub use payment_intent::{create_payment_intent, PaymentIntent};
