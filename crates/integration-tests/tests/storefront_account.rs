//! Integration tests for auth, account, and wishlist routes.
//!
//! Run with: cargo test -p wicker-integration-tests

use reqwest::StatusCode;
use serde_json::{Value, json};

use wicker_integration_tests::{TEST_EMAIL, TEST_PASSWORD, TestContext};

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_sets_session() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .post("/api/auth/login")
        .json(&json!({"email": TEST_EMAIL, "password": TEST_PASSWORD}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["email"], TEST_EMAIL);
    assert_eq!(body["first_name"], "Ada");

    // Session cookie now authenticates /me
    let resp = ctx.get("/api/auth/me").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bad_credentials_rejected_uniformly() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .post("/api/auth/login")
        .json(&json!({"email": TEST_EMAIL, "password": "wrong-password"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("json");
    // No hint about which part was wrong
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_me_requires_login() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/api/auth/me").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let ctx = TestContext::spawn().await;
    ctx.login().await;

    let resp = ctx
        .post("/api/auth/logout")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx.get("/api/auth/me").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_creates_customer_and_logs_in() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .post("/api/auth/register")
        .json(&json!({
            "email": "grace@example.com",
            "password": "a-long-enough-password",
            "first_name": "Grace"
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ctx.get("/api/auth/me").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["email"], "grace@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email_passes_upstream_message() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .post("/api/auth/register")
        .json(&json!({"email": TEST_EMAIL, "password": "a-long-enough-password"}))
        .send()
        .await
        .expect("request failed");
    // Upstream 400 passes through with its shopper-facing reason
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Account: orders
// ============================================================================

#[tokio::test]
async fn test_order_history_is_customer_scoped() {
    let ctx = TestContext::spawn().await;
    ctx.login().await;

    // Place an order as the logged-in customer
    let _ = ctx.add_to_cart(101, 1).await;
    let resp = ctx
        .post("/api/checkout")
        .json(&json!({
            "payment_method": "cod",
            "billing": {"first_name": "Ada", "country": "GB", "email": TEST_EMAIL}
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("json");
    let order_id = order["order"]["id"].as_i64().expect("order id");

    let resp = ctx
        .get("/api/account/orders")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], order_id);

    // Detail works for the owner
    let resp = ctx
        .get(&format!("/api/account/orders/{order_id}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_foreign_order_reads_as_missing() {
    let ctx = TestContext::spawn().await;

    // A guest places an order
    let _ = ctx.add_to_cart(101, 1).await;
    let resp = ctx
        .post("/api/checkout")
        .json(&json!({
            "payment_method": "cod",
            "billing": {"first_name": "Guest", "country": "GB"}
        }))
        .send()
        .await
        .expect("request failed");
    let order: Value = resp.json().await.expect("json");
    let order_id = order["order"]["id"].as_i64().expect("order id");

    // A logged-in customer cannot see it - indistinguishable from missing
    ctx.login().await;
    let resp = ctx
        .get(&format!("/api/account/orders/{order_id}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_routes_require_login() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/account/orders")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Account: addresses
// ============================================================================

#[tokio::test]
async fn test_address_book_roundtrip() {
    let ctx = TestContext::spawn().await;
    ctx.login().await;

    let resp = ctx
        .get("/api/account/addresses")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["billing"]["city"], "London");

    let resp = ctx
        .put("/api/account/addresses")
        .json(&json!({
            "shipping": {
                "first_name": "Ada",
                "address_1": "1 New Street",
                "city": "Cambridge",
                "postcode": "CB1 1AA",
                "country": "GB"
            }
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["shipping"]["city"], "Cambridge");
    // Billing untouched
    assert_eq!(body["billing"]["city"], "London");
}

#[tokio::test]
async fn test_address_update_requires_some_address() {
    let ctx = TestContext::spawn().await;
    ctx.login().await;

    let resp = ctx
        .put("/api/account/addresses")
        .json(&json!({}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Wishlist
// ============================================================================

#[tokio::test]
async fn test_wishlist_roundtrip_as_guest() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/api/wishlist").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["items"].as_array().expect("items").len(), 0);

    let resp = ctx
        .post("/api/wishlist/items")
        .json(&json!({"product_id": 101}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json");
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    // Hydrated with the product
    assert_eq!(items[0]["product"]["slug"], "fig-jam");

    let resp = ctx
        .delete("/api/wishlist/items/101")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["items"].as_array().expect("items").len(), 0);
}

#[tokio::test]
async fn test_wishlists_are_session_scoped() {
    let ctx_a = TestContext::spawn().await;
    let _ = ctx_a
        .post("/api/wishlist/items")
        .json(&json!({"product_id": 101}))
        .send()
        .await
        .expect("request failed");

    // A different session (fresh context, fresh cookie jar) sees nothing
    let ctx_b = TestContext::spawn().await;
    let resp = ctx_b.get("/api/wishlist").send().await.expect("request failed");
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["items"].as_array().expect("items").len(), 0);
}
