//! Cache types for WooCommerce API responses.

use crate::woo::types::{Category, Page, PaymentGateway, Product, Variation};

/// Cached value types.
///
/// Keys are strings built from the request shape (see the client methods);
/// a hit with the wrong variant is treated as a miss.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
    Category(Box<Category>),
    Categories(Page<Category>),
    Variations(Vec<Variation>),
    Gateways(Vec<PaymentGateway>),
}
