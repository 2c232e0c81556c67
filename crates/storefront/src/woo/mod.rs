//! WooCommerce and WordPress REST API clients.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; WooCommerce is the source of truth - NO local
//!   sync, direct API calls
//! - Raw wire shapes live in `rest::wire` and never leave this module;
//!   conversions reshape them into the storefront-facing types in [`types`]
//! - In-memory caching via `moka` for catalogue reads (5 minute TTL)
//!
//! # APIs
//!
//! ## WooCommerce REST API (`/wp-json/wc/v3`)
//! - Products, categories, variations, coupons
//! - Orders and customers (server-side, Basic auth with consumer key/secret)
//! - Payment gateways
//!
//! ## WordPress content API (`/wp-json/wp/v2`)
//! - CMS pages and blog posts (public, no auth)
//!
//! ## Storefront plugin API (`/wp-json/storefront/v1`)
//! - Wishlists, keyed by an opaque share token
//!
//! ## JWT auth (`/wp-json/jwt-auth/v1`)
//! - Customer login; the resulting token is held in the session and passed
//!   through on customer-scoped calls
//!
//! # Example
//!
//! ```rust,ignore
//! use wicker_storefront::woo::WooClient;
//!
//! let client = WooClient::new(&config.woocommerce);
//!
//! // Get a product
//! let product = client.get_product_by_slug("fig-jam").await?;
//!
//! // Create an order from cart lines
//! let order = client.create_order(&payload).await?;
//! ```

mod content;
mod rest;
pub mod types;

pub use content::ContentClient;
pub use rest::{
    CreateCustomerPayload, CreateOrderPayload, MAX_PER_PAGE, OrderLinePayload, ProductQuery,
    UpdateCustomerPayload, WooClient,
};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the WooCommerce/WordPress APIs.
#[derive(Debug, Error)]
pub enum WooError {
    /// HTTP request failed (transport-level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream returned an error body (`{code, message, data: {status}}`).
    #[error("API error ({status} {code}): {message}")]
    Api {
        /// HTTP status reported by the upstream.
        status: u16,
        /// WooCommerce machine-readable error code.
        code: String,
        /// Human-readable message.
        message: String,
    },

    /// Response body could not be deserialized.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited upstream.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl WooError {
    /// Whether this error is the upstream saying "no such thing".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_woo_error_display() {
        let err = WooError::NotFound("product fig-jam".to_string());
        assert_eq!(err.to_string(), "Not found: product fig-jam");

        let err = WooError::Api {
            status: 400,
            code: "woocommerce_rest_invalid_coupon".to_string(),
            message: "Coupon does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (400 woocommerce_rest_invalid_coupon): Coupon does not exist"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(WooError::NotFound("x".to_string()).is_not_found());
        assert!(
            WooError::Api {
                status: 404,
                code: "woocommerce_rest_product_invalid_id".to_string(),
                message: "Invalid ID.".to_string(),
            }
            .is_not_found()
        );
        assert!(!WooError::RateLimited(5).is_not_found());
    }

    #[test]
    fn test_rate_limited_error() {
        let err = WooError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
