//! Session-related types.
//!
//! Types stored in the session: authentication state and the cart itself.
//! The cart lives entirely in the session (guest-first); the upstream only
//! learns about it at order creation.

use serde::{Deserialize, Serialize};
use wicker_core::{CustomerId, Email, Price, ProductId, VariationId};

/// Session-stored customer identity.
///
/// Minimal data stored in the session to identify the logged-in customer.
/// The JWT is held for upstream validation, never sent to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// WooCommerce customer ID.
    pub id: CustomerId,
    /// Customer's email address.
    pub email: Email,
    /// Display name from the upstream login response.
    pub display_name: String,
    /// Customer JWT issued by the upstream on login.
    pub token: String,
}

/// A single cart line held in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Opaque line key (UUID), stable across quantity updates.
    pub key: String,
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub quantity: u32,
    /// Unit price observed when the line was added or last synced.
    /// Price drift against this is reported by cart sync.
    pub unit_price: Option<Price>,
}

impl CartLine {
    /// Whether another line refers to the same purchasable.
    #[must_use]
    pub fn same_item(&self, product_id: ProductId, variation_id: Option<VariationId>) -> bool {
        self.product_id == product_id && self.variation_id == variation_id
    }
}

/// The session cart: lines plus applied coupon codes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionCart {
    pub lines: Vec<CartLine>,
    pub coupon_codes: Vec<String>,
}

impl SessionCart {
    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Session keys for stored state.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";

    /// Key for storing the session cart.
    pub const CART: &str = "cart";

    /// Key for the wishlist share token proxied to the upstream plugin.
    pub const WISHLIST_TOKEN: &str = "wishlist_token";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_same_item() {
        let line = CartLine {
            key: "k1".to_string(),
            product_id: ProductId::new(101),
            variation_id: Some(VariationId::new(201)),
            quantity: 1,
            unit_price: None,
        };

        assert!(line.same_item(ProductId::new(101), Some(VariationId::new(201))));
        assert!(!line.same_item(ProductId::new(101), None));
        assert!(!line.same_item(ProductId::new(102), Some(VariationId::new(201))));
    }

    #[test]
    fn test_session_cart_item_count() {
        let cart = SessionCart {
            lines: vec![
                CartLine {
                    key: "k1".to_string(),
                    product_id: ProductId::new(101),
                    variation_id: None,
                    quantity: 2,
                    unit_price: None,
                },
                CartLine {
                    key: "k2".to_string(),
                    product_id: ProductId::new(102),
                    variation_id: None,
                    quantity: 3,
                    unit_price: None,
                },
            ],
            coupon_codes: vec![],
        };

        assert_eq!(cart.item_count(), 5);
        assert!(!cart.is_empty());
        assert!(SessionCart::default().is_empty());
    }
}
