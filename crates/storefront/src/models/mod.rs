//! Domain models for storefront.
//!
//! Everything the gateway keeps in its own session state lives here; the
//! commerce entities themselves (products, orders, customers) are owned by
//! the upstream and only pass through as [`crate::woo::types`].

pub mod session;

pub use session::{CartLine, CurrentCustomer, SessionCart, keys as session_keys};
