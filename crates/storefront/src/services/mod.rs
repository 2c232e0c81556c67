//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session cart and the synchronization/validation layer
//! - `checkout` - Order submission with idempotency keys and submit locks

pub mod cart;
pub mod checkout;
