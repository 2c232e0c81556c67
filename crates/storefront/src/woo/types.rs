//! Domain types for the WooCommerce REST API.
//!
//! These types provide a clean, ergonomic shape separate from the raw wire
//! DTOs in `rest::wire`. They are what the proxy routes serialize for the
//! browser frontend, so field names here are part of the public API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wicker_core::{
    CategoryId, CouponId, CustomerId, OrderId, OrderStatus, Price, ProductId, StockStatus,
    VariationId,
};

// =============================================================================
// Pagination
// =============================================================================

/// A page of results, with totals taken from the upstream's
/// `X-WP-Total` / `X-WP-TotalPages` headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Map the items of the page, preserving pagination metadata.
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

// =============================================================================
// Image Types
// =============================================================================

/// Product, category, or variation image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// WordPress media attachment ID.
    pub id: Option<i64>,
    /// Image URL.
    pub src: String,
    /// Alt text for accessibility.
    pub alt: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// A product attribute definition (e.g., "Size" with its options).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub id: i64,
    /// Attribute name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub options: Vec<String>,
    /// Whether the attribute is used to distinguish variations.
    pub variation: bool,
}

/// An attribute value selected on a variation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedAttribute {
    /// Attribute name (e.g., "Size").
    pub name: String,
    /// Selected value (e.g., "Large").
    pub option: String,
}

/// Lightweight category reference embedded on a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A storefront product.
///
/// WooCommerce returns the full object on both list and detail endpoints,
/// so one type serves both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL-safe handle, unique per product.
    pub slug: String,
    /// Canonical URL on the WordPress host.
    pub permalink: String,
    /// Full description (HTML from the upstream editor, passed through).
    pub description: String,
    /// Short description (HTML, passed through).
    pub short_description: String,
    pub sku: String,
    /// Current effective price. `None` for variable products without a
    /// resolved price.
    pub price: Option<Price>,
    pub regular_price: Option<Price>,
    pub sale_price: Option<Price>,
    pub on_sale: bool,
    pub purchasable: bool,
    pub featured: bool,
    pub stock_status: StockStatus,
    /// Remaining stock when the product manages inventory.
    pub stock_quantity: Option<i64>,
    pub manages_stock: bool,
    pub categories: Vec<CategoryRef>,
    pub images: Vec<Image>,
    pub attributes: Vec<Attribute>,
    /// Variation IDs for variable products (fetched separately).
    pub variations: Vec<VariationId>,
    /// Products the upstream considers related.
    pub related_ids: Vec<ProductId>,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
}

impl Product {
    /// Whether a cart line for this product survives validation.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.purchasable && self.stock_status.is_purchasable()
    }
}

/// A variation of a variable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variation {
    pub id: VariationId,
    pub sku: String,
    pub price: Option<Price>,
    pub regular_price: Option<Price>,
    pub sale_price: Option<Price>,
    pub on_sale: bool,
    pub purchasable: bool,
    pub stock_status: StockStatus,
    pub stock_quantity: Option<i64>,
    pub attributes: Vec<SelectedAttribute>,
    pub image: Option<Image>,
}

// =============================================================================
// Category Types
// =============================================================================

/// A product category (WordPress term).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    /// Parent category, `None` for top-level categories.
    pub parent: Option<CategoryId>,
    pub description: String,
    /// Number of published products in the category.
    pub count: i64,
    pub image: Option<Image>,
}

// =============================================================================
// Coupon Types
// =============================================================================

/// A coupon, as far as the storefront needs to know it.
///
/// Only existence and basic usability are checked here; the actual discount
/// math happens upstream at order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    /// Raw amount; meaning depends on `discount_type`.
    pub amount: String,
    /// `percent`, `fixed_cart`, or `fixed_product`.
    pub discount_type: String,
    pub date_expires: Option<DateTime<Utc>>,
    pub usage_count: i64,
    pub usage_limit: Option<i64>,
}

impl Coupon {
    /// Whether the coupon is still usable at a glance (expiry and usage
    /// limit). The upstream recheck at order creation is authoritative.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        if let Some(expires) = self.date_expires
            && expires < now
        {
            return false;
        }
        if let Some(limit) = self.usage_limit
            && self.usage_count >= limit
        {
            return false;
        }
        true
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// A postal address, used for both billing and shipping.
///
/// WooCommerce only carries email/phone on billing addresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A line item on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    /// Line total before discounts.
    pub subtotal: Price,
    /// Line total after discounts.
    pub total: Price,
}

/// An order, reshaped from the upstream order resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Customer-facing order number (usually the ID, but plugins override it).
    pub number: String,
    /// Order key used by the upstream's hosted payment page.
    pub order_key: String,
    pub status: OrderStatus,
    /// `None` for guest orders.
    pub customer_id: Option<CustomerId>,
    pub date_created: Option<DateTime<Utc>>,
    pub total: Price,
    pub total_tax: Price,
    pub shipping_total: Price,
    pub discount_total: Price,
    pub line_items: Vec<OrderLine>,
    pub billing: Address,
    pub shipping: Address,
    pub payment_method: String,
    pub payment_method_title: String,
    pub customer_note: String,
    /// URL of the upstream's pay page for the order, when payment is pending.
    pub payment_url: Option<String>,
}

// =============================================================================
// Customer Types
// =============================================================================

/// A customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub billing: Address,
    pub shipping: Address,
}

// =============================================================================
// Checkout Support Types
// =============================================================================

/// A payment gateway enabled on the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentGateway {
    /// Gateway ID to submit as `payment_method` (e.g., "stripe", "cod").
    pub id: String,
    pub title: String,
    pub description: String,
}

// =============================================================================
// Wishlist Types
// =============================================================================

/// A wishlist entry from the storefront plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub date_added: Option<DateTime<Utc>>,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Result of a successful JWT login against the upstream.
#[derive(Debug, Clone)]
pub struct AuthToken {
    /// Bearer token for customer-scoped calls.
    pub token: String,
    pub email: String,
    pub display_name: String,
}

// =============================================================================
// Content Types (WordPress wp/v2)
// =============================================================================

/// A CMS page or blog post, reshaped from the wp/v2 rendered fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub slug: String,
    /// Rendered title (HTML entities intact, passed through).
    pub title: String,
    /// Rendered body HTML, passed through.
    pub content: String,
    /// Rendered excerpt HTML.
    pub excerpt: String,
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_coupon_usable_no_limits() {
        let coupon = Coupon {
            id: CouponId::new(1),
            code: "WELCOME10".to_string(),
            amount: "10".to_string(),
            discount_type: "percent".to_string(),
            date_expires: None,
            usage_count: 3,
            usage_limit: None,
        };
        assert!(coupon.is_usable(Utc::now()));
    }

    #[test]
    fn test_coupon_expired() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let coupon = Coupon {
            id: CouponId::new(1),
            code: "SPRING".to_string(),
            amount: "5".to_string(),
            discount_type: "fixed_cart".to_string(),
            date_expires: Some(Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()),
            usage_count: 0,
            usage_limit: None,
        };
        assert!(!coupon.is_usable(now));
    }

    #[test]
    fn test_coupon_usage_exhausted() {
        let coupon = Coupon {
            id: CouponId::new(1),
            code: "ONCE".to_string(),
            amount: "5".to_string(),
            discount_type: "fixed_cart".to_string(),
            date_expires: None,
            usage_count: 1,
            usage_limit: Some(1),
        };
        assert!(!coupon.is_usable(Utc::now()));
    }

    #[test]
    fn test_page_map_items() {
        let page = Page {
            items: vec![1, 2, 3],
            page: 2,
            per_page: 3,
            total: 9,
            total_pages: 3,
        };
        let mapped = page.map_items(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.total, 9);
    }
}
