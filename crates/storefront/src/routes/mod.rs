//! HTTP route handlers for storefront.
//!
//! Every route returns JSON for the browser frontend; errors use the
//! envelope from [`crate::error`].
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Upstream reachability check
//!
//! # Catalogue
//! GET  /api/home                     - Featured products + top-level categories
//! GET  /api/products                 - Product listing (filters + sort + pagination)
//! GET  /api/products/{slug}          - Product detail (incl. variations)
//! GET  /api/products/{slug}/related  - Related products
//! GET  /api/categories               - Category listing
//! GET  /api/categories/{slug}        - Category detail + its products
//! GET  /api/search?q=                - Delegated product search
//!
//! # Content (WordPress wp/v2)
//! GET  /api/pages/{slug}             - CMS page
//! GET  /api/posts                    - Blog listing
//! GET  /api/posts/{slug}             - Blog post
//!
//! # Cart (session-backed)
//! GET    /api/cart                   - Hydrated cart view
//! POST   /api/cart/items             - Add line
//! PATCH  /api/cart/items/{key}       - Update quantity
//! DELETE /api/cart/items/{key}       - Remove line
//! POST   /api/cart/coupon            - Apply coupon code
//! DELETE /api/cart/coupon            - Remove coupon code
//! POST   /api/cart/sync              - Revalidate lines, report adjustments
//!
//! # Checkout
//! GET  /api/checkout/payment-methods - Enabled payment gateways
//! POST /api/checkout                 - Submit order (Idempotency-Key honored)
//!
//! # Auth
//! POST /api/auth/login               - JWT proxy login
//! POST /api/auth/register            - Create customer + login
//! POST /api/auth/logout              - Logout
//! GET  /api/auth/me                  - Current customer
//!
//! # Account (requires auth)
//! GET  /api/account/orders           - Order history
//! GET  /api/account/orders/{id}      - Order detail (ownership-checked)
//! GET  /api/account/addresses        - Billing/shipping addresses
//! PUT  /api/account/addresses        - Update addresses
//!
//! # Wishlist (session token, guest-friendly)
//! GET    /api/wishlist               - Wishlist items
//! POST   /api/wishlist/items         - Add product
//! DELETE /api/wishlist/items/{product_id} - Remove product
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod home;
pub mod pages;
pub mod products;
pub mod search;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, checkout_rate_limiter};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
        .route("/{slug}/related", get(products::related))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{slug}", get(categories::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    use axum::routing::patch;

    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{key}",
            patch(cart::update_item).delete(cart::remove_item),
        )
        .route("/coupon", post(cart::apply_coupon).delete(cart::remove_coupon))
        .route("/sync", post(cart::sync))
}

/// Create the checkout routes router (strict rate limit).
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::submit))
        .route("/payment-methods", get(checkout::payment_methods))
        .layer(checkout_rate_limiter())
}

/// Create the auth routes router (strict rate limit).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(checkout_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order_detail))
        .route(
            "/addresses",
            get(account::addresses).put(account::update_addresses),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    use axum::routing::delete;

    Router::new()
        .route("/", get(wishlist::show))
        .route("/items", post(wishlist::add_item))
        .route("/items/{product_id}", delete(wishlist::remove_item))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .route("/home", get(home::home))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .route("/search", get(search::search))
        .route("/pages/{slug}", get(pages::page))
        .route("/posts", get(pages::posts))
        .route("/posts/{slug}", get(pages::post))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/account", account_routes())
        .layer(api_rate_limiter())
        // Strictly limited groups carry their own layer
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes());

    Router::new().nest("/api", api)
}
