// storefront/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart_line;
pub mod order;
pub mod product;
pub mod user_profile;

// Re-export the model structs for convenient access
pub use cart_line::CartLineRow;
pub use order::{NewOrder, Order, OrderItem, OrderStatus, ShippingInfo};
pub use product::{NewProduct, ProductRow};
pub use user_profile::{Role, UserProfile};
