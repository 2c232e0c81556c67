//! Integration test harness for Wicker.
//!
//! Spins up the real storefront router in-process, pointed at a mock
//! WooCommerce upstream (an axum server serving canned wire JSON on an
//! ephemeral port), and drives it with a cookie-holding `reqwest` client.
//! No external services, no env vars; every test owns its own pair of
//! servers.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::spawn().await;
//! let resp = ctx.get("/api/products").send().await.unwrap();
//! assert_eq!(resp.status(), 200);
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};

use wicker_storefront::config::{CheckoutConfig, StorefrontConfig, WooCommerceConfig};
use wicker_storefront::state::AppState;

/// Credentials the mock upstream accepts for JWT login.
pub const TEST_EMAIL: &str = "ada@example.com";
pub const TEST_PASSWORD: &str = "correct-battery-staple-9";
/// Customer ID behind [`TEST_EMAIL`].
pub const TEST_CUSTOMER_ID: i64 = 9;

// =============================================================================
// Mock upstream state
// =============================================================================

/// Shared, mutable state of the mock WooCommerce upstream.
pub struct MockState {
    products: Mutex<Vec<Value>>,
    coupons: Mutex<Vec<Value>>,
    customers: Mutex<Vec<Value>>,
    orders: Mutex<Vec<Value>>,
    wishlists: Mutex<HashMap<String, Vec<i64>>>,
    next_order_id: AtomicI64,
    next_customer_id: AtomicI64,
    orders_created: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn product_fixture(id: i64, name: &str, slug: &str, price: &str, stock: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": slug,
        "permalink": format!("https://shop.test/product/{slug}/"),
        "description": format!("<p>{name}.</p>"),
        "short_description": "",
        "sku": format!("SKU-{id}"),
        "price": price,
        "regular_price": price,
        "sale_price": "",
        "on_sale": false,
        "purchasable": true,
        "featured": id == 101,
        "stock_status": if stock > 0 { "instock" } else { "outofstock" },
        "stock_quantity": stock,
        "manage_stock": true,
        "categories": [{"id": 7, "name": "Pantry", "slug": "pantry"}],
        "images": [{"id": id * 10, "src": format!("https://shop.test/{slug}.jpg"), "alt": name}],
        "attributes": [],
        "variations": [],
        "related_ids": if id == 101 { json!([102]) } else { json!([]) },
        "average_rating": "0.00",
        "rating_count": 0
    })
}

impl Default for MockState {
    fn default() -> Self {
        let products = vec![
            product_fixture(101, "Fig Jam", "fig-jam", "8.50", 14),
            product_fixture(102, "Olive Oil", "olive-oil", "19.00", 6),
            product_fixture(103, "Beeswax Candle", "beeswax-candle", "12.00", 0),
        ];

        let coupons = vec![
            json!({
                "id": 31,
                "code": "welcome10",
                "amount": "10.00",
                "discount_type": "percent",
                "date_expires_gmt": null,
                "usage_count": 2,
                "usage_limit": 100
            }),
            json!({
                "id": 32,
                "code": "spring",
                "amount": "5.00",
                "discount_type": "fixed_cart",
                "date_expires_gmt": "2020-01-01T00:00:00",
                "usage_count": 0,
                "usage_limit": null
            }),
        ];

        let customers = vec![json!({
            "id": TEST_CUSTOMER_ID,
            "email": TEST_EMAIL,
            "first_name": "Ada",
            "last_name": "Byron",
            "username": "ada",
            "billing": {
                "first_name": "Ada",
                "last_name": "Byron",
                "address_1": "12 Analytical Way",
                "city": "London",
                "postcode": "N1 9GU",
                "country": "GB",
                "email": TEST_EMAIL,
                "phone": ""
            },
            "shipping": {}
        })];

        Self {
            products: Mutex::new(products),
            coupons: Mutex::new(coupons),
            customers: Mutex::new(customers),
            orders: Mutex::new(Vec::new()),
            wishlists: Mutex::new(HashMap::new()),
            next_order_id: AtomicI64::new(5001),
            next_customer_id: AtomicI64::new(10),
            orders_created: AtomicUsize::new(0),
        }
    }
}

/// Handle for poking the mock upstream from tests.
#[derive(Clone)]
pub struct Mock {
    state: Arc<MockState>,
}

impl Mock {
    /// Change a product's live price (for price-drift sync tests).
    pub fn set_price(&self, product_id: i64, price: &str) {
        let mut products = lock(&self.state.products);
        for product in products.iter_mut() {
            if product["id"] == product_id {
                product["price"] = json!(price);
                product["regular_price"] = json!(price);
            }
        }
    }

    /// Change a product's remaining stock (for clamp tests).
    pub fn set_stock(&self, product_id: i64, stock: i64) {
        let mut products = lock(&self.state.products);
        for product in products.iter_mut() {
            if product["id"] == product_id {
                product["stock_quantity"] = json!(stock);
                product["stock_status"] =
                    json!(if stock > 0 { "instock" } else { "outofstock" });
            }
        }
    }

    /// Delete a product outright (for removed-line sync tests).
    pub fn remove_product(&self, product_id: i64) {
        lock(&self.state.products).retain(|p| p["id"] != product_id);
    }

    /// How many orders the upstream has created.
    #[must_use]
    pub fn orders_created(&self) -> usize {
        self.state.orders_created.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Mock upstream handlers
// =============================================================================

fn not_found(code: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "code": code,
            "message": "Invalid ID.",
            "data": {"status": 404}
        })),
    )
        .into_response()
}

fn paged(items: Vec<Value>, params: &HashMap<String, String>) -> Response {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: usize = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(12);

    let total = items.len();
    let total_pages = total.div_ceil(per_page.max(1));
    let start = (page.saturating_sub(1)) * per_page;
    let slice: Vec<Value> = items.into_iter().skip(start).take(per_page).collect();

    let mut headers = HeaderMap::new();
    headers.insert("X-WP-Total", HeaderValue::from(total));
    headers.insert("X-WP-TotalPages", HeaderValue::from(total_pages));

    (headers, Json(Value::Array(slice))).into_response()
}

async fn list_products(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let products = lock(&state.products).clone();

    let filtered: Vec<Value> = products
        .into_iter()
        .filter(|p| {
            if let Some(slug) = params.get("slug") {
                return p["slug"] == slug.as_str();
            }
            if let Some(include) = params.get("include") {
                return include
                    .split(',')
                    .filter_map(|id| id.parse::<i64>().ok())
                    .any(|id| p["id"] == id);
            }
            if let Some(search) = params.get("search") {
                let name = p["name"].as_str().unwrap_or_default().to_lowercase();
                if !name.contains(&search.to_lowercase()) {
                    return false;
                }
            }
            if params.get("featured").map(String::as_str) == Some("true")
                && p["featured"] != true
            {
                return false;
            }
            if let Some(category) = params.get("category") {
                let in_category = p["categories"]
                    .as_array()
                    .is_some_and(|cats| cats.iter().any(|c| c["id"].to_string() == *category));
                if !in_category {
                    return false;
                }
            }
            true
        })
        .collect();

    paged(filtered, &params)
}

async fn get_product(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    let products = lock(&state.products);
    products.iter().find(|p| p["id"] == id).map_or_else(
        || not_found("woocommerce_rest_product_invalid_id"),
        |product| Json(product.clone()).into_response(),
    )
}

async fn list_variations() -> Json<Value> {
    // Fixtures are simple products
    Json(json!([]))
}

async fn list_categories(Query(params): Query<HashMap<String, String>>) -> Response {
    let categories = vec![json!({
        "id": 7,
        "name": "Pantry",
        "slug": "pantry",
        "parent": 0,
        "description": "Shelf-stable goods",
        "count": 3,
        "image": null
    })];

    let filtered: Vec<Value> = categories
        .into_iter()
        .filter(|c| {
            params
                .get("slug")
                .is_none_or(|slug| c["slug"] == slug.as_str())
        })
        .collect();

    paged(filtered, &params)
}

async fn list_coupons(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let coupons = lock(&state.coupons).clone();
    let filtered: Vec<Value> = coupons
        .into_iter()
        .filter(|c| {
            params.get("code").is_none_or(|code| {
                c["code"]
                    .as_str()
                    .is_some_and(|cc| cc.eq_ignore_ascii_case(code))
            })
        })
        .collect();
    paged(filtered, &params)
}

async fn create_order(State(state): State<Arc<MockState>>, Json(payload): Json<Value>) -> Response {
    let id = state.next_order_id.fetch_add(1, Ordering::SeqCst);
    state.orders_created.fetch_add(1, Ordering::SeqCst);

    let products = lock(&state.products).clone();
    let mut total = 0.0_f64;
    let line_items: Vec<Value> = payload["line_items"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let product = products.iter().find(|p| p["id"] == line["product_id"]);
            let price: f64 = product
                .and_then(|p| p["price"].as_str())
                .and_then(|p| p.parse().ok())
                .unwrap_or(0.0);
            let quantity = line["quantity"].as_u64().unwrap_or(1);
            #[allow(clippy::cast_precision_loss)]
            let line_total = price * quantity as f64;
            total += line_total;
            json!({
                "id": i64::try_from(i).unwrap_or(0) + 1,
                "name": product.map_or(Value::Null, |p| p["name"].clone()),
                "product_id": line["product_id"],
                "variation_id": line.get("variation_id").cloned().unwrap_or(json!(0)),
                "quantity": quantity,
                "sku": product.map_or(Value::Null, |p| p["sku"].clone()),
                "subtotal": format!("{line_total:.2}"),
                "total": format!("{line_total:.2}")
            })
        })
        .collect();

    let order = json!({
        "id": id,
        "number": id.to_string(),
        "order_key": format!("wc_order_{id}"),
        "status": "pending",
        "customer_id": payload.get("customer_id").cloned().unwrap_or(json!(0)),
        "currency": "USD",
        "date_created_gmt": "2025-08-01T10:00:00",
        "total": format!("{total:.2}"),
        "total_tax": "0.00",
        "shipping_total": "0.00",
        "discount_total": "0.00",
        "line_items": line_items,
        "billing": payload.get("billing").cloned().unwrap_or(json!({})),
        "shipping": payload.get("shipping").cloned().unwrap_or(json!({})),
        "payment_method": payload.get("payment_method").cloned().unwrap_or(json!("")),
        "payment_method_title": "Card",
        "customer_note": payload.get("customer_note").cloned().unwrap_or(json!("")),
        "payment_url": format!("https://shop.test/checkout/order-pay/{id}/")
    });

    lock(&state.orders).push(order.clone());
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn list_orders(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let orders = lock(&state.orders).clone();
    let filtered: Vec<Value> = orders
        .into_iter()
        .filter(|o| {
            params
                .get("customer")
                .is_none_or(|customer| o["customer_id"].to_string() == *customer)
        })
        .collect();
    paged(filtered, &params)
}

async fn get_order(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    let orders = lock(&state.orders);
    orders.iter().find(|o| o["id"] == id).map_or_else(
        || not_found("woocommerce_rest_order_invalid_id"),
        |order| Json(order.clone()).into_response(),
    )
}

async fn list_customers(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let customers = lock(&state.customers).clone();
    let filtered: Vec<Value> = customers
        .into_iter()
        .filter(|c| {
            params
                .get("email")
                .is_none_or(|email| c["email"] == email.as_str())
        })
        .collect();
    paged(filtered, &params)
}

async fn create_customer(
    State(state): State<Arc<MockState>>,
    Json(payload): Json<Value>,
) -> Response {
    let email = payload["email"].as_str().unwrap_or_default().to_string();

    let mut customers = lock(&state.customers);
    if customers.iter().any(|c| c["email"] == email.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "code": "registration-error-email-exists",
                "message": "An account is already registered with your email address.",
                "data": {"status": 400}
            })),
        )
            .into_response();
    }

    let id = state.next_customer_id.fetch_add(1, Ordering::SeqCst);
    let customer = json!({
        "id": id,
        "email": email,
        "first_name": payload.get("first_name").cloned().unwrap_or(json!("")),
        "last_name": payload.get("last_name").cloned().unwrap_or(json!("")),
        "username": email,
        "billing": {},
        "shipping": {}
    });
    customers.push(customer.clone());

    (StatusCode::CREATED, Json(customer)).into_response()
}

async fn get_customer(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    let customers = lock(&state.customers);
    customers.iter().find(|c| c["id"] == id).map_or_else(
        || not_found("woocommerce_rest_customer_invalid_id"),
        |customer| Json(customer.clone()).into_response(),
    )
}

async fn update_customer(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Response {
    let mut customers = lock(&state.customers);
    let Some(customer) = customers.iter_mut().find(|c| c["id"] == id) else {
        return not_found("woocommerce_rest_customer_invalid_id");
    };

    if let Some(billing) = payload.get("billing") {
        customer["billing"] = billing.clone();
    }
    if let Some(shipping) = payload.get("shipping") {
        customer["shipping"] = shipping.clone();
    }

    Json(customer.clone()).into_response()
}

async fn payment_gateways() -> Json<Value> {
    Json(json!([
        {"id": "stripe", "title": "Card", "description": "Pay by card", "enabled": true},
        {"id": "cod", "title": "Cash on delivery", "description": "", "enabled": true},
        {"id": "paypal", "title": "PayPal", "description": "", "enabled": false}
    ]))
}

async fn jwt_token(Json(payload): Json<Value>) -> Response {
    let username = payload["username"].as_str().unwrap_or_default();
    let password = payload["password"].as_str().unwrap_or_default();

    if username == TEST_EMAIL && password == TEST_PASSWORD {
        return Json(json!({
            "token": "test-jwt-token",
            "user_email": TEST_EMAIL,
            "user_nicename": "ada",
            "user_display_name": "Ada Byron"
        }))
        .into_response();
    }

    // New registrations also log in; accept anything the mock created
    if password.len() >= 8 && username.contains('@') && username != TEST_EMAIL {
        return Json(json!({
            "token": "test-jwt-token-new",
            "user_email": username,
            "user_nicename": username,
            "user_display_name": username
        }))
        .into_response();
    }

    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "code": "[jwt_auth] incorrect_password",
            "message": "Invalid credentials.",
            "data": {"status": 403}
        })),
    )
        .into_response()
}

async fn jwt_validate() -> Json<Value> {
    Json(json!({"code": "jwt_auth_valid_token", "data": {"status": 200}}))
}

fn wishlist_items(state: &MockState, token: &str) -> Value {
    let wishlists = lock(&state.wishlists);
    let items: Vec<Value> = wishlists
        .get(token)
        .map(|ids| {
            ids.iter()
                .map(|id| json!({"product_id": id, "date_added_gmt": "2025-07-01T09:00:00"}))
                .collect()
        })
        .unwrap_or_default();
    Value::Array(items)
}

async fn get_wishlist(State(state): State<Arc<MockState>>, Path(token): Path<String>) -> Response {
    Json(wishlist_items(&state, &token)).into_response()
}

async fn add_wishlist(
    State(state): State<Arc<MockState>>,
    Path(token): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let product_id = payload["product_id"].as_i64().unwrap_or(0);
    {
        let mut wishlists = lock(&state.wishlists);
        let items = wishlists.entry(token.clone()).or_default();
        if !items.contains(&product_id) {
            items.push(product_id);
        }
    }
    Json(wishlist_items(&state, &token)).into_response()
}

async fn remove_wishlist(
    State(state): State<Arc<MockState>>,
    Path((token, product_id)): Path<(String, i64)>,
) -> Response {
    {
        let mut wishlists = lock(&state.wishlists);
        if let Some(items) = wishlists.get_mut(&token) {
            items.retain(|id| *id != product_id);
        }
    }
    Json(wishlist_items(&state, &token)).into_response()
}

async fn wp_pages(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let pages = vec![json!({
        "id": 12,
        "slug": "shipping-policy",
        "date_gmt": "2025-01-15T08:00:00",
        "title": {"rendered": "Shipping &amp; Returns"},
        "content": {"rendered": "<p>We ship twice a week.</p>"},
        "excerpt": {"rendered": "<p>We ship twice a week.</p>"}
    })];

    let filtered: Vec<Value> = pages
        .into_iter()
        .filter(|p| {
            params
                .get("slug")
                .is_none_or(|slug| p["slug"] == slug.as_str())
        })
        .collect();
    Json(Value::Array(filtered))
}

async fn wp_posts(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let posts = vec![json!({
        "id": 40,
        "slug": "harvest-notes",
        "date_gmt": "2025-06-20T07:30:00",
        "title": {"rendered": "Harvest Notes"},
        "content": {"rendered": "<p>The figs are in.</p>"},
        "excerpt": {"rendered": "<p>The figs are in.</p>"}
    })];

    let filtered: Vec<Value> = posts
        .into_iter()
        .filter(|p| {
            params
                .get("slug")
                .is_none_or(|slug| p["slug"] == slug.as_str())
        })
        .collect();
    Json(Value::Array(filtered))
}

async fn namespace_index() -> Json<Value> {
    Json(json!({"namespace": "wc/v3", "routes": {}}))
}

fn mock_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/wp-json/wc/v3", get(namespace_index))
        .route("/wp-json/wc/v3/products", get(list_products))
        .route("/wp-json/wc/v3/products/categories", get(list_categories))
        .route("/wp-json/wc/v3/products/{id}", get(get_product))
        .route(
            "/wp-json/wc/v3/products/{id}/variations",
            get(list_variations),
        )
        .route("/wp-json/wc/v3/coupons", get(list_coupons))
        .route("/wp-json/wc/v3/orders", get(list_orders).post(create_order))
        .route("/wp-json/wc/v3/orders/{id}", get(get_order))
        .route(
            "/wp-json/wc/v3/customers",
            get(list_customers).post(create_customer),
        )
        .route(
            "/wp-json/wc/v3/customers/{id}",
            get(get_customer).put(update_customer),
        )
        .route("/wp-json/wc/v3/payment_gateways", get(payment_gateways))
        .route("/wp-json/jwt-auth/v1/token", post(jwt_token))
        .route("/wp-json/jwt-auth/v1/token/validate", post(jwt_validate))
        .route("/wp-json/storefront/v1/wishlist/{token}", get(get_wishlist))
        .route(
            "/wp-json/storefront/v1/wishlist/{token}/items",
            post(add_wishlist),
        )
        .route(
            "/wp-json/storefront/v1/wishlist/{token}/items/{product_id}",
            axum::routing::delete(remove_wishlist),
        )
        .route("/wp-json/wp/v2/pages", get(wp_pages))
        .route("/wp-json/wp/v2/posts", get(wp_posts))
        .with_state(state)
}

// =============================================================================
// Test context
// =============================================================================

/// A running storefront + mock upstream pair.
pub struct TestContext {
    /// Cookie-holding client aimed at the storefront.
    pub client: reqwest::Client,
    /// Storefront base URL (`http://127.0.0.1:port`).
    pub base_url: String,
    /// Handle for poking the mock upstream.
    pub mock: Mock,
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });
    addr
}

impl TestContext {
    /// Spawn a mock upstream and a storefront wired to it.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to start.
    pub async fn spawn() -> Self {
        let mock_state = Arc::new(MockState::default());
        let mock_addr = serve(mock_router(mock_state.clone())).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            allowed_origins: vec![],
            session_secret: SecretString::from(uuid::Uuid::new_v4().simple().to_string()),
            woocommerce: WooCommerceConfig {
                url: format!("http://{mock_addr}"),
                api_version: "wc/v3".to_string(),
                consumer_key: "ck_integration".to_string(),
                consumer_secret: SecretString::from("cs_integration"),
                currency: wicker_core::CurrencyCode::USD,
                cache_ttl: std::time::Duration::from_secs(300),
            },
            checkout: CheckoutConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let app_state = AppState::new(config);
        app_state.start_sweepers();
        let app_addr = serve(wicker_storefront::app(app_state)).await;

        // The rate limiter keys on proxy headers; give the test client a
        // stable client IP
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            reqwest::header::HeaderValue::from_static("203.0.113.7"),
        );

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: format!("http://{app_addr}"),
            mock: Mock { state: mock_state },
        }
    }

    /// Build a GET request against the storefront.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{path}", self.base_url))
    }

    /// Build a POST request against the storefront.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("{}{path}", self.base_url))
    }

    /// Build a PATCH request against the storefront.
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.patch(format!("{}{path}", self.base_url))
    }

    /// Build a PUT request against the storefront.
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.put(format!("{}{path}", self.base_url))
    }

    /// Build a DELETE request against the storefront.
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(format!("{}{path}", self.base_url))
    }

    /// Log the fixture customer in, establishing the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails.
    pub async fn login(&self) {
        let resp = self
            .post("/api/auth/login")
            .json(&json!({"email": TEST_EMAIL, "password": TEST_PASSWORD}))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(resp.status(), reqwest::StatusCode::OK, "login failed");
    }

    /// Add a product to the session cart.
    ///
    /// # Panics
    ///
    /// Panics if the add request fails.
    pub async fn add_to_cart(&self, product_id: i64, quantity: u32) -> Value {
        let resp = self
            .post("/api/cart/items")
            .json(&json!({"product_id": product_id, "quantity": quantity}))
            .send()
            .await
            .expect("add to cart failed");
        assert_eq!(resp.status(), reqwest::StatusCode::OK, "add to cart failed");
        resp.json().await.expect("cart view not JSON")
    }
}
