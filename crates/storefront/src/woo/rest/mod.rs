//! WooCommerce REST API client implementation.
//!
//! Plain REST over `reqwest` with Basic auth (consumer key/secret).
//! Catalogue reads are cached in `moka` (5-minute TTL by default); anything
//! customer- or order-scoped is never cached.

mod cache;
pub(crate) mod conversions;
pub(crate) mod wire;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};
use wicker_core::{CategoryId, CurrencyCode, CustomerId, OrderId, ProductId};

use crate::config::WooCommerceConfig;
use crate::woo::WooError;
use crate::woo::types::{
    Address, AuthToken, Category, Coupon, Customer, Order, Page, PaymentGateway, Product,
    Variation, WishlistItem,
};

use cache::CacheValue;
use conversions::{
    convert_category, convert_coupon, convert_customer, convert_order, convert_product,
    convert_variation, parse_gmt,
};
use wire::{
    WireCategory, WireCoupon, WireCustomer, WireError, WireJwtToken, WireOrder,
    WirePaymentGateway, WireProduct, WireVariation, WireWishlistItem,
};

/// Upper bound WooCommerce accepts for `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

// =============================================================================
// Query Types
// =============================================================================

/// Filters for product listings, mirroring the upstream query parameters.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// 1-based page number (0 is treated as 1).
    pub page: u32,
    pub per_page: u32,
    pub category: Option<CategoryId>,
    pub search: Option<String>,
    /// `date`, `title`, `price`, `popularity`, or `rating`.
    pub orderby: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub featured: Option<bool>,
    pub on_sale: Option<bool>,
    /// Restrict to specific product IDs (used for related products).
    pub include: Vec<ProductId>,
}

impl ProductQuery {
    fn page(&self) -> u32 {
        self.page.max(1)
    }

    fn per_page(&self) -> u32 {
        match self.per_page {
            0 => 12,
            n => n.min(MAX_PER_PAGE),
        }
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page().to_string()),
            ("per_page", self.per_page().to_string()),
            ("status", "publish".to_string()),
        ];
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(orderby) = &self.orderby {
            params.push(("orderby", orderby.clone()));
        }
        if let Some(order) = &self.order {
            params.push(("order", order.clone()));
        }
        if let Some(min_price) = &self.min_price {
            params.push(("min_price", min_price.clone()));
        }
        if let Some(max_price) = &self.max_price {
            params.push(("max_price", max_price.clone()));
        }
        if let Some(featured) = self.featured {
            params.push(("featured", featured.to_string()));
        }
        if let Some(on_sale) = self.on_sale {
            params.push(("on_sale", on_sale.to_string()));
        }
        if !self.include.is_empty() {
            let ids = self
                .include
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("include", ids));
        }
        params
    }

    /// Search results churn with inventory; only filter-shaped queries cache.
    fn is_cacheable(&self) -> bool {
        self.search.is_none() && self.include.is_empty()
    }

    fn cache_key(&self) -> String {
        format!(
            "products:{}:{}:{}:{}:{}:{}:{}:{}:{}",
            self.page(),
            self.per_page(),
            self.category.map_or_else(String::new, |c| c.to_string()),
            self.orderby.as_deref().unwrap_or(""),
            self.order.as_deref().unwrap_or(""),
            self.min_price.as_deref().unwrap_or(""),
            self.max_price.as_deref().unwrap_or(""),
            self.featured.map_or(-1, i64::from),
            self.on_sale.map_or(-1, i64::from),
        )
    }
}

// =============================================================================
// Write Payloads
// =============================================================================

/// Line item for order creation.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLinePayload {
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<i64>,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
struct CouponLinePayload {
    code: String,
}

/// Payload for `POST /orders`.
///
/// All money math (line totals, tax, coupon discounts, shipping) is computed
/// upstream from these inputs; the storefront never sends amounts.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderPayload {
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_title: Option<String>,
    pub set_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    pub billing: Address,
    pub shipping: Address,
    pub line_items: Vec<OrderLinePayload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    coupon_lines: Vec<CouponLinePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_note: Option<String>,
}

impl CreateOrderPayload {
    /// Build an order payload; coupon codes become `coupon_lines`.
    #[must_use]
    pub fn new(
        payment_method: String,
        customer_id: Option<CustomerId>,
        billing: Address,
        shipping: Address,
        line_items: Vec<OrderLinePayload>,
        coupon_codes: Vec<String>,
        customer_note: Option<String>,
    ) -> Self {
        Self {
            payment_method,
            payment_method_title: None,
            set_paid: false,
            customer_id: customer_id.map(|id| id.as_i64()),
            billing,
            shipping,
            line_items,
            coupon_lines: coupon_codes
                .into_iter()
                .map(|code| CouponLinePayload { code })
                .collect(),
            customer_note,
        }
    }
}

/// Payload for `POST /customers`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomerPayload {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Payload for `PUT /customers/{id}` (address book updates).
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCustomerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Address>,
}

// =============================================================================
// WooClient
// =============================================================================

/// Client for the WooCommerce REST API.
///
/// Provides typed access to products, categories, coupons, orders,
/// customers, and the storefront wishlist plugin. Catalogue reads are cached.
#[derive(Clone)]
pub struct WooClient {
    inner: Arc<WooClientInner>,
}

struct WooClientInner {
    client: reqwest::Client,
    base_url: String,
    api_namespace: String,
    consumer_key: String,
    consumer_secret: String,
    currency: CurrencyCode,
    cache: Cache<String, CacheValue>,
}

impl WooClient {
    /// Create a new WooCommerce API client.
    #[must_use]
    pub fn new(config: &WooCommerceConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(WooClientInner {
                client: reqwest::Client::new(),
                base_url: config.url.clone(),
                api_namespace: config.api_version.clone(),
                consumer_key: config.consumer_key.clone(),
                consumer_secret: config.consumer_secret.expose_secret().to_string(),
                currency: config.currency,
                cache,
            }),
        }
    }

    /// The configured store currency.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.currency
    }

    fn wc_url(&self, path: &str) -> String {
        format!(
            "{}/wp-json/{}/{path}",
            self.inner.base_url, self.inner.api_namespace
        )
    }

    fn plugin_url(&self, path: &str) -> String {
        format!("{}/wp-json/storefront/v1/{path}", self.inner.base_url)
    }

    fn jwt_url(&self, path: &str) -> String {
        format!("{}/wp-json/jwt-auth/v1/{path}", self.inner.base_url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.inner.consumer_key, Some(&self.inner.consumer_secret))
    }

    /// Decode a response, mapping upstream error bodies and rate limits.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, WooError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(WooError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<WireError>(&body) {
                return Err(WooError::Api {
                    status: err
                        .data
                        .and_then(|d| d.status)
                        .unwrap_or_else(|| status.as_u16()),
                    code: err.code,
                    message: err.message,
                });
            }

            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Upstream returned non-success status with unreadable body"
            );
            return Err(WooError::Api {
                status: status.as_u16(),
                code: "upstream_error".to_string(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse upstream response"
            );
            WooError::Parse(e.to_string())
        })
    }

    /// GET a collection endpoint and return items plus the pagination totals
    /// from the `X-WP-Total` / `X-WP-TotalPages` headers.
    async fn get_paged<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<(Vec<T>, u64, u32), WooError> {
        let response = self
            .authed(self.inner.client.get(url).query(params))
            .send()
            .await?;

        let (total, total_pages) = page_meta(response.headers());
        let items = Self::decode(response).await?;
        Ok((items, total, total_pages))
    }

    async fn get_one<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, WooError> {
        let response = self
            .authed(self.inner.client.get(url).query(params))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Probe the upstream with a credentialed request against the namespace
    /// index. Cheap, uncached; used by the readiness endpoint and the CLI.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream is unreachable or rejects the
    /// credentials.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), WooError> {
        let url = format!(
            "{}/wp-json/{}",
            self.inner.base_url, self.inner.api_namespace
        );
        let response = self.authed(self.inner.client.get(url)).send().await?;
        let _: serde_json::Value = Self::decode(response).await?;
        Ok(())
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a paginated list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>, WooError> {
        let cache_key = query.cache_key();

        if query.is_cacheable()
            && let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let params = query.to_params();
        let (items, total, total_pages) = self
            .get_paged::<WireProduct>(&self.wc_url("products"), &params)
            .await?;

        let page = Page {
            items: items
                .into_iter()
                .map(|p| convert_product(p, self.inner.currency))
                .collect::<Result<_, _>>()?,
            page: query.page(),
            per_page: query.per_page(),
            total,
            total_pages,
        };

        if query.is_cacheable() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Product, WooError> {
        let cache_key = format!("product:slug:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let params = [
            ("slug", slug.to_string()),
            ("status", "publish".to_string()),
        ];
        let wires: Vec<WireProduct> = self.get_one(&self.wc_url("products"), &params).await?;

        let wire = wires
            .into_iter()
            .next()
            .ok_or_else(|| WooError::NotFound(format!("Product not found: {slug}")))?;
        let product = convert_product(wire, self.inner.currency)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a product by ID. Not cached: this is the validation path for cart
    /// sync and checkout, which need live stock and pricing.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, WooError> {
        let url = self.wc_url(&format!("products/{product_id}"));
        let wire: WireProduct = self.get_one(&url, &[]).await.map_err(|e| {
            if e.is_not_found() {
                WooError::NotFound(format!("Product not found: {product_id}"))
            } else {
                e
            }
        })?;
        convert_product(wire, self.inner.currency)
    }

    /// Get the variations of a variable product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn list_variations(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Variation>, WooError> {
        let cache_key = format!("variations:{product_id}");

        if let Some(CacheValue::Variations(variations)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for variations");
            return Ok(variations);
        }

        let url = self.wc_url(&format!("products/{product_id}/variations"));
        let params = [("per_page", MAX_PER_PAGE.to_string())];
        let wires: Vec<WireVariation> = self.get_one(&url, &params).await?;

        let variations = wires
            .into_iter()
            .map(|v| convert_variation(v, self.inner.currency))
            .collect::<Result<Vec<_>, _>>()?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Variations(variations.clone()))
            .await;

        Ok(variations)
    }

    /// Get a single variation with live stock and pricing (validation path,
    /// not cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the variation is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id, variation_id = %variation_id))]
    pub async fn get_variation(
        &self,
        product_id: ProductId,
        variation_id: wicker_core::VariationId,
    ) -> Result<Variation, WooError> {
        let url = self.wc_url(&format!("products/{product_id}/variations/{variation_id}"));
        let wire: WireVariation = self.get_one(&url, &[]).await.map_err(|e| {
            if e.is_not_found() {
                WooError::NotFound(format!("Variation not found: {variation_id}"))
            } else {
                e
            }
        })?;
        convert_variation(wire, self.inner.currency)
    }

    /// Fetch specific products by ID (related products).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ids))]
    pub async fn get_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, WooError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = ProductQuery {
            per_page: u32::try_from(ids.len()).unwrap_or(MAX_PER_PAGE).min(MAX_PER_PAGE),
            include: ids.to_vec(),
            ..ProductQuery::default()
        };
        Ok(self.list_products(&query).await?.items)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Get a paginated list of categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        page: u32,
        per_page: u32,
        parent: Option<CategoryId>,
    ) -> Result<Page<Category>, WooError> {
        let page_number = page.max(1);
        let per_page = match per_page {
            0 => 50,
            n => n.min(MAX_PER_PAGE),
        };
        let cache_key = format!(
            "categories:{page_number}:{per_page}:{}",
            parent.map_or_else(String::new, |p| p.to_string())
        );

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let mut params = vec![
            ("page", page_number.to_string()),
            ("per_page", per_page.to_string()),
            ("hide_empty", "true".to_string()),
        ];
        if let Some(parent) = parent {
            params.push(("parent", parent.to_string()));
        }

        let (items, total, total_pages) = self
            .get_paged::<WireCategory>(&self.wc_url("products/categories"), &params)
            .await?;

        let result = Page {
            items: items.into_iter().map(convert_category).collect(),
            page: page_number,
            per_page,
            total,
            total_pages,
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(result.clone()))
            .await;

        Ok(result)
    }

    /// Get a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Category, WooError> {
        let cache_key = format!("category:slug:{slug}");

        if let Some(CacheValue::Category(category)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let params = [("slug", slug.to_string())];
        let wires: Vec<WireCategory> = self
            .get_one(&self.wc_url("products/categories"), &params)
            .await?;

        let wire = wires
            .into_iter()
            .next()
            .ok_or_else(|| WooError::NotFound(format!("Category not found: {slug}")))?;
        let category = convert_category(wire);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;

        Ok(category)
    }

    // =========================================================================
    // Coupon Methods (not cached - usability must be fresh)
    // =========================================================================

    /// Look up a coupon by its code.
    ///
    /// # Errors
    ///
    /// Returns an error if no coupon with the code exists or the request fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn get_coupon_by_code(&self, code: &str) -> Result<Coupon, WooError> {
        let params = [("code", code.to_string())];
        let wires: Vec<WireCoupon> = self.get_one(&self.wc_url("coupons"), &params).await?;

        wires
            .into_iter()
            // Upstream matches case-insensitively; trust its answer
            .next()
            .map(convert_coupon)
            .ok_or_else(|| WooError::NotFound(format!("Coupon not found: {code}")))
    }

    // =========================================================================
    // Order Methods (never cached - mutable state)
    // =========================================================================

    /// Create an order. All pricing, tax, coupon, and stock math happens
    /// upstream from this payload.
    ///
    /// # Errors
    ///
    /// Returns an error if order creation fails; a 400 from upstream carries
    /// the shopper-facing reason (invalid coupon, out of stock).
    #[instrument(skip(self, payload))]
    pub async fn create_order(&self, payload: &CreateOrderPayload) -> Result<Order, WooError> {
        let response = self
            .authed(self.inner.client.post(self.wc_url("orders")).json(payload))
            .send()
            .await?;
        let wire: WireOrder = Self::decode(response).await?;
        convert_order(wire, self.inner.currency)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, WooError> {
        let url = self.wc_url(&format!("orders/{order_id}"));
        let wire: WireOrder = self.get_one(&url, &[]).await.map_err(|e| {
            if e.is_not_found() {
                WooError::NotFound(format!("Order not found: {order_id}"))
            } else {
                e
            }
        })?;
        convert_order(wire, self.inner.currency)
    }

    /// Get a customer's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn list_orders(
        &self,
        customer_id: CustomerId,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Order>, WooError> {
        let page_number = page.max(1);
        let per_page = match per_page {
            0 => 10,
            n => n.min(MAX_PER_PAGE),
        };
        let params = [
            ("customer", customer_id.to_string()),
            ("page", page_number.to_string()),
            ("per_page", per_page.to_string()),
            ("orderby", "date".to_string()),
            ("order", "desc".to_string()),
        ];

        let (items, total, total_pages) = self
            .get_paged::<WireOrder>(&self.wc_url("orders"), &params)
            .await?;

        Ok(Page {
            items: items
                .into_iter()
                .map(|o| convert_order(o, self.inner.currency))
                .collect::<Result<_, _>>()?,
            page: page_number,
            per_page,
            total,
            total_pages,
        })
    }

    // =========================================================================
    // Customer Methods
    // =========================================================================

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is not found or the request fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn get_customer(&self, customer_id: CustomerId) -> Result<Customer, WooError> {
        let url = self.wc_url(&format!("customers/{customer_id}"));
        let wire: WireCustomer = self.get_one(&url, &[]).await.map_err(|e| {
            if e.is_not_found() {
                WooError::NotFound(format!("Customer not found: {customer_id}"))
            } else {
                e
            }
        })?;
        Ok(convert_customer(wire))
    }

    /// Find a customer by email, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, email))]
    pub async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Customer>, WooError> {
        let params = [("email", email.to_string())];
        let wires: Vec<WireCustomer> = self.get_one(&self.wc_url("customers"), &params).await?;
        Ok(wires.into_iter().next().map(convert_customer))
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails (e.g., the email is taken - the
    /// upstream 400 carries the reason).
    #[instrument(skip(self, payload))]
    pub async fn create_customer(
        &self,
        payload: &CreateCustomerPayload,
    ) -> Result<Customer, WooError> {
        let response = self
            .authed(
                self.inner
                    .client
                    .post(self.wc_url("customers"))
                    .json(payload),
            )
            .send()
            .await?;
        let wire: WireCustomer = Self::decode(response).await?;
        Ok(convert_customer(wire))
    }

    /// Update a customer's billing/shipping addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    #[instrument(skip(self, payload), fields(customer_id = %customer_id))]
    pub async fn update_customer(
        &self,
        customer_id: CustomerId,
        payload: &UpdateCustomerPayload,
    ) -> Result<Customer, WooError> {
        let url = self.wc_url(&format!("customers/{customer_id}"));
        let response = self
            .authed(self.inner.client.put(url).json(payload))
            .send()
            .await?;
        let wire: WireCustomer = Self::decode(response).await?;
        Ok(convert_customer(wire))
    }

    // =========================================================================
    // Payment Gateways
    // =========================================================================

    /// List payment gateways enabled on the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_payment_gateways(&self) -> Result<Vec<PaymentGateway>, WooError> {
        let cache_key = "payment_gateways".to_string();

        if let Some(CacheValue::Gateways(gateways)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for payment gateways");
            return Ok(gateways);
        }

        let wires: Vec<WirePaymentGateway> = self
            .get_one(&self.wc_url("payment_gateways"), &[])
            .await?;

        let gateways: Vec<PaymentGateway> = wires
            .into_iter()
            .filter(|g| g.enabled)
            .map(|g| PaymentGateway {
                id: g.id,
                title: g.title,
                description: g.description,
            })
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Gateways(gateways.clone()))
            .await;

        Ok(gateways)
    }

    // =========================================================================
    // Auth (jwt-auth/v1 plugin)
    // =========================================================================

    /// Exchange credentials for a customer JWT.
    ///
    /// # Errors
    ///
    /// Returns an error when the credentials are rejected (upstream 403) or
    /// the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken, WooError> {
        let body = serde_json::json!({
            "username": email,
            "password": password,
        });

        // No consumer-key auth here: the JWT endpoint authenticates the
        // shopper's own credentials
        let response = self
            .inner
            .client
            .post(self.jwt_url("token"))
            .json(&body)
            .send()
            .await?;
        let wire: WireJwtToken = Self::decode(response).await?;

        Ok(AuthToken {
            token: wire.token,
            email: wire.user_email,
            display_name: wire.user_display_name,
        })
    }

    /// Check that a previously issued JWT is still valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn validate_token(&self, token: &str) -> Result<(), WooError> {
        let response = self
            .inner
            .client
            .post(self.jwt_url("token/validate"))
            .bearer_auth(token)
            .send()
            .await?;

        // Body is `{code: "jwt_auth_valid_token", ...}` on success; status
        // is what matters
        let _: serde_json::Value = Self::decode(response).await?;
        Ok(())
    }

    // =========================================================================
    // Wishlist (storefront/v1 plugin)
    // =========================================================================

    /// Get the wishlist for a share token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. An unknown token yields an
    /// empty list, not an error.
    #[instrument(skip(self, token))]
    pub async fn get_wishlist(&self, token: &str) -> Result<Vec<WishlistItem>, WooError> {
        let url = self.plugin_url(&format!("wishlist/{}", urlencoding::encode(token)));
        let result = self.get_one::<Vec<WireWishlistItem>>(&url, &[]).await;

        match result {
            Ok(wires) => Ok(wires.into_iter().map(convert_wishlist_item).collect()),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Add a product to a wishlist. Returns the updated list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_wishlist_item(
        &self,
        token: &str,
        product_id: ProductId,
    ) -> Result<Vec<WishlistItem>, WooError> {
        let url = self.plugin_url(&format!("wishlist/{}/items", urlencoding::encode(token)));
        let body = serde_json::json!({ "product_id": product_id.as_i64() });

        let response = self
            .authed(self.inner.client.post(url).json(&body))
            .send()
            .await?;
        let wires: Vec<WireWishlistItem> = Self::decode(response).await?;
        Ok(wires.into_iter().map(convert_wishlist_item).collect())
    }

    /// Remove a product from a wishlist. Returns the updated list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_wishlist_item(
        &self,
        token: &str,
        product_id: ProductId,
    ) -> Result<Vec<WishlistItem>, WooError> {
        let url = self.plugin_url(&format!(
            "wishlist/{}/items/{product_id}",
            urlencoding::encode(token)
        ));

        let response = self.authed(self.inner.client.delete(url)).send().await?;
        let wires: Vec<WireWishlistItem> = Self::decode(response).await?;
        Ok(wires.into_iter().map(convert_wishlist_item).collect())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product (both slug and listing entries go stale
    /// together only on TTL; this is for targeted refreshes).
    pub async fn invalidate_product(&self, slug: &str) {
        self.inner
            .cache
            .invalidate(&format!("product:slug:{slug}"))
            .await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

fn convert_wishlist_item(wire: WireWishlistItem) -> WishlistItem {
    WishlistItem {
        product_id: ProductId::new(wire.product_id),
        date_added: parse_gmt(wire.date_added_gmt.as_deref()),
    }
}

/// Extract pagination totals from the `X-WP-Total` / `X-WP-TotalPages`
/// headers. Missing headers degrade to zero rather than failing the request.
fn page_meta(headers: &reqwest::header::HeaderMap) -> (u64, u32) {
    let total = headers
        .get("X-WP-Total")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);
    let total_pages = headers
        .get("X-WP-TotalPages")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);
    (total, total_pages)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn test_page_meta_parses_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("X-WP-Total", HeaderValue::from_static("57"));
        headers.insert("X-WP-TotalPages", HeaderValue::from_static("5"));
        assert_eq!(page_meta(&headers), (57, 5));
    }

    #[test]
    fn test_page_meta_missing_headers() {
        let headers = HeaderMap::new();
        assert_eq!(page_meta(&headers), (0, 0));
    }

    #[test]
    fn test_product_query_defaults() {
        let query = ProductQuery::default();
        let params = query.to_params();
        assert!(params.contains(&("page", "1".to_string())));
        assert!(params.contains(&("per_page", "12".to_string())));
        assert!(params.contains(&("status", "publish".to_string())));
        assert!(query.is_cacheable());
    }

    #[test]
    fn test_product_query_search_not_cacheable() {
        let query = ProductQuery {
            search: Some("jam".to_string()),
            ..ProductQuery::default()
        };
        assert!(!query.is_cacheable());
        assert!(query.to_params().contains(&("search", "jam".to_string())));
    }

    #[test]
    fn test_product_query_per_page_clamped() {
        let query = ProductQuery {
            per_page: 500,
            ..ProductQuery::default()
        };
        assert!(
            query
                .to_params()
                .contains(&("per_page", MAX_PER_PAGE.to_string()))
        );
    }

    #[test]
    fn test_product_query_include_ids() {
        let query = ProductQuery {
            include: vec![ProductId::new(1), ProductId::new(2)],
            ..ProductQuery::default()
        };
        assert!(query.to_params().contains(&("include", "1,2".to_string())));
        assert!(!query.is_cacheable());
    }

    #[test]
    fn test_cache_keys_distinguish_filters() {
        let a = ProductQuery {
            category: Some(CategoryId::new(7)),
            ..ProductQuery::default()
        };
        let b = ProductQuery {
            on_sale: Some(true),
            ..ProductQuery::default()
        };
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_create_order_payload_serializes_coupon_lines() {
        let payload = CreateOrderPayload::new(
            "stripe".to_string(),
            Some(CustomerId::new(9)),
            Address::default(),
            Address::default(),
            vec![OrderLinePayload {
                product_id: 101,
                variation_id: None,
                quantity: 2,
            }],
            vec!["WELCOME10".to_string()],
            None,
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["payment_method"], "stripe");
        assert_eq!(json["set_paid"], false);
        assert_eq!(json["customer_id"], 9);
        assert_eq!(json["line_items"][0]["product_id"], 101);
        // variation_id omitted when None
        assert!(json["line_items"][0].get("variation_id").is_none());
        assert_eq!(json["coupon_lines"][0]["code"], "WELCOME10");
    }

    #[test]
    fn test_create_order_payload_omits_empty_coupons() {
        let payload = CreateOrderPayload::new(
            "cod".to_string(),
            None,
            Address::default(),
            Address::default(),
            vec![],
            vec![],
            None,
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("coupon_lines").is_none());
        assert!(json.get("customer_id").is_none());
    }
}
