//! Raw wire DTOs for the WooCommerce REST API.
//!
//! These mirror the upstream JSON schema field-for-field; this repository
//! does not own their invariants - WooCommerce does. Nothing here leaves the
//! client module: the conversions layer reshapes wire types into
//! [`crate::woo::types`] before handlers see them.
//!
//! Quirks worth knowing:
//! - Monetary amounts are decimal strings, and can be empty (`""`) on
//!   variable products without a resolved price.
//! - `variation_id: 0` and `parent: 0` mean "none".
//! - Local datetimes come without an offset; the `_gmt` variants are the
//!   ones safe to parse as UTC.

use serde::Deserialize;

/// Upstream error body: `{code, message, data: {status}}`.
#[derive(Debug, Deserialize)]
pub struct WireError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub data: Option<WireErrorData>,
}

#[derive(Debug, Deserialize)]
pub struct WireErrorData {
    pub status: Option<u16>,
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireProduct {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub regular_price: String,
    #[serde(default)]
    pub sale_price: String,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub purchasable: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_stock_status")]
    pub stock_status: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub manage_stock: bool,
    #[serde(default)]
    pub categories: Vec<WireCategoryRef>,
    #[serde(default)]
    pub images: Vec<WireImage>,
    #[serde(default)]
    pub attributes: Vec<WireAttribute>,
    #[serde(default)]
    pub variations: Vec<i64>,
    #[serde(default)]
    pub related_ids: Vec<i64>,
    #[serde(default)]
    pub average_rating: String,
    #[serde(default)]
    pub rating_count: i64,
}

fn default_stock_status() -> String {
    "instock".to_string()
}

#[derive(Debug, Deserialize)]
pub struct WireCategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct WireImage {
    #[serde(default)]
    pub id: Option<i64>,
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Deserialize)]
pub struct WireAttribute {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub variation: bool,
}

#[derive(Debug, Deserialize)]
pub struct WireVariation {
    pub id: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub regular_price: String,
    #[serde(default)]
    pub sale_price: String,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub purchasable: bool,
    #[serde(default = "default_stock_status")]
    pub stock_status: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub attributes: Vec<WireSelectedAttribute>,
    #[serde(default)]
    pub image: Option<WireImage>,
}

#[derive(Debug, Deserialize)]
pub struct WireSelectedAttribute {
    pub name: String,
    pub option: String,
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// 0 means top-level.
    #[serde(default)]
    pub parent: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub image: Option<WireImage>,
}

// =============================================================================
// Coupons
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireCoupon {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub discount_type: String,
    #[serde(default)]
    pub date_expires_gmt: Option<String>,
    #[serde(default)]
    pub usage_count: i64,
    #[serde(default)]
    pub usage_limit: Option<i64>,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireOrder {
    pub id: i64,
    pub number: String,
    #[serde(default)]
    pub order_key: String,
    pub status: String,
    /// 0 for guest orders.
    #[serde(default)]
    pub customer_id: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub date_created_gmt: Option<String>,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub total_tax: String,
    #[serde(default)]
    pub shipping_total: String,
    #[serde(default)]
    pub discount_total: String,
    #[serde(default)]
    pub line_items: Vec<WireOrderLine>,
    #[serde(default)]
    pub billing: WireAddress,
    #[serde(default)]
    pub shipping: WireAddress,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub payment_method_title: String,
    #[serde(default)]
    pub customer_note: String,
    #[serde(default)]
    pub payment_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireOrderLine {
    pub id: i64,
    pub name: String,
    pub product_id: i64,
    /// 0 when the line is not a variation.
    #[serde(default)]
    pub variation_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub subtotal: String,
    #[serde(default)]
    pub total: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireAddress {
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
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireCustomer {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub billing: WireAddress,
    #[serde(default)]
    pub shipping: WireAddress,
}

// =============================================================================
// Payment Gateways
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WirePaymentGateway {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
}

// =============================================================================
// Wishlist (storefront/v1 plugin)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireWishlistItem {
    pub product_id: i64,
    #[serde(default)]
    pub date_added_gmt: Option<String>,
}

// =============================================================================
// Auth (jwt-auth/v1 plugin)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireJwtToken {
    pub token: String,
    pub user_email: String,
    #[serde(default)]
    pub user_display_name: String,
}

// =============================================================================
// Content (wp/v2)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireContent {
    pub id: i64,
    pub slug: String,
    #[serde(default)]
    pub date_gmt: Option<String>,
    pub title: WireRendered,
    pub content: WireRendered,
    #[serde(default)]
    pub excerpt: Option<WireRendered>,
}

#[derive(Debug, Deserialize)]
pub struct WireRendered {
    #[serde(default)]
    pub rendered: String,
}
