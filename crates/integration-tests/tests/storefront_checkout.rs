//! Integration tests for checkout: submission, idempotency replay, and the
//! cart-changed guard.
//!
//! Run with: cargo test -p wicker-integration-tests

use reqwest::StatusCode;
use serde_json::{Value, json};

use wicker_integration_tests::TestContext;

fn checkout_body() -> Value {
    json!({
        "payment_method": "stripe",
        "billing": {
            "first_name": "Ada",
            "last_name": "Byron",
            "address_1": "12 Analytical Way",
            "city": "London",
            "postcode": "N1 9GU",
            "country": "GB",
            "email": "ada@example.com"
        }
    })
}

// ============================================================================
// Payment methods
// ============================================================================

#[tokio::test]
async fn test_payment_methods_lists_enabled_gateways() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/checkout/payment-methods")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    let gateways = body.as_array().expect("array");
    // The disabled paypal gateway is filtered out
    assert_eq!(gateways.len(), 2);
    assert!(gateways.iter().all(|g| g["id"] != "paypal"));
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_checkout_creates_order_and_clears_cart() {
    let ctx = TestContext::spawn().await;
    let _ = ctx.add_to_cart(101, 2).await;

    let resp = ctx
        .post("/api/checkout")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["replayed"], false);
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["order"]["total"]["amount"], "17.00");
    assert_eq!(body["order"]["line_items"][0]["quantity"], 2);
    assert!(body["order"]["payment_url"].is_string());

    // The cart is cleared after a successful submit
    let resp = ctx.get("/api/cart").send().await.expect("request failed");
    let cart: Value = resp.json().await.expect("json");
    assert_eq!(cart["item_count"], 0);

    assert_eq!(ctx.mock.orders_created(), 1);
}

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .post("/api/checkout")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["error"]["code"], "empty_cart");
    assert_eq!(ctx.mock.orders_created(), 0);
}

#[tokio::test]
async fn test_logged_in_checkout_carries_customer_id() {
    let ctx = TestContext::spawn().await;
    ctx.login().await;
    let _ = ctx.add_to_cart(101, 1).await;

    let resp = ctx
        .post("/api/checkout")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(
        body["order"]["customer_id"],
        wicker_integration_tests::TEST_CUSTOMER_ID
    );
}

// ============================================================================
// Idempotency
// ============================================================================

#[tokio::test]
async fn test_idempotent_replay_does_not_resubmit() {
    let ctx = TestContext::spawn().await;
    let _ = ctx.add_to_cart(101, 1).await;

    let first = ctx
        .post("/api/checkout")
        .header("Idempotency-Key", "key-123")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(first.status(), StatusCode::CREATED);
    let first_body: Value = first.json().await.expect("json");

    // Client lost the response and retries with the same key; the cart is
    // already empty, which must not matter
    let second = ctx
        .post("/api/checkout")
        .header("Idempotency-Key", "key-123")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(second.status(), StatusCode::OK);
    let second_body: Value = second.json().await.expect("json");

    assert_eq!(second_body["replayed"], true);
    assert_eq!(second_body["order"]["id"], first_body["order"]["id"]);

    // Only one order reached the upstream
    assert_eq!(ctx.mock.orders_created(), 1);
}

#[tokio::test]
async fn test_different_keys_create_different_orders() {
    let ctx = TestContext::spawn().await;

    let _ = ctx.add_to_cart(101, 1).await;
    let first = ctx
        .post("/api/checkout")
        .header("Idempotency-Key", "key-a")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(first.status(), StatusCode::CREATED);

    let _ = ctx.add_to_cart(102, 1).await;
    let second = ctx
        .post("/api/checkout")
        .header("Idempotency-Key", "key-b")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(second.status(), StatusCode::CREATED);

    assert_eq!(ctx.mock.orders_created(), 2);
}

// ============================================================================
// Cart-changed guard
// ============================================================================

#[tokio::test]
async fn test_drifted_cart_is_not_submitted() {
    let ctx = TestContext::spawn().await;
    let _ = ctx.add_to_cart(102, 5).await;

    // Stock drops between the shopper's last look and checkout
    ctx.mock.set_stock(102, 2);

    let resp = ctx
        .post("/api/checkout")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["error"]["code"], "cart_changed");
    assert_eq!(body["adjustments"][0]["kind"], "quantity_clamped");
    // The corrected cart comes back for re-confirmation
    assert_eq!(body["cart"]["lines"][0]["quantity"], 2);

    // Nothing reached the upstream
    assert_eq!(ctx.mock.orders_created(), 0);

    // Retrying the corrected cart succeeds
    let resp = ctx
        .post("/api/checkout")
        .json(&checkout_body())
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(ctx.mock.orders_created(), 1);
}
