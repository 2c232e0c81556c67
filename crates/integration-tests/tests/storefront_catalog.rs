//! Integration tests for the catalogue proxy routes.
//!
//! Each test spawns its own storefront + mock upstream pair (see
//! `wicker_integration_tests::TestContext`); no external services needed.
//!
//! Run with: cargo test -p wicker-integration-tests

use reqwest::StatusCode;
use serde_json::Value;

use wicker_integration_tests::TestContext;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/health").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_readiness_probes_upstream() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/health/ready")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_product_listing_with_pagination_meta() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/api/products").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["items"].as_array().expect("items").len(), 3);
}

#[tokio::test]
async fn test_product_detail_by_slug() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/products/fig-jam")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["id"], 101);
    assert_eq!(body["name"], "Fig Jam");
    // Price is reshaped into {amount, currency_code}
    assert_eq!(body["price"]["amount"], "8.50");
    assert_eq!(body["price"]["currency_code"], "USD");
    assert_eq!(body["stock_status"], "instock");
}

#[tokio::test]
async fn test_unknown_product_is_404_envelope() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/products/no-such-thing")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_related_products() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/products/fig-jam/related")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    let related = body.as_array().expect("array");
    assert_eq!(related.len(), 1);
    assert_eq!(related.first().expect("item")["id"], 102);
}

// ============================================================================
// Categories & Search
// ============================================================================

#[tokio::test]
async fn test_category_detail_includes_products() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/categories/pantry")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["slug"], "pantry");
    assert_eq!(body["products"]["total"], 3);
}

#[tokio::test]
async fn test_search_delegates_to_upstream() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/search?q=olive")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().expect("item")["slug"], "olive-oil");
}

#[tokio::test]
async fn test_search_requires_query() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/search?q=%20")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Home & Content
// ============================================================================

#[tokio::test]
async fn test_home_aggregate() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/api/home").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    // Only product 101 is featured in the fixtures
    assert_eq!(body["featured"].as_array().expect("featured").len(), 1);
    assert_eq!(body["categories"].as_array().expect("categories").len(), 1);
}

#[tokio::test]
async fn test_cms_page_passthrough() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/pages/shipping-policy")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json");
    // Rendered HTML and entities pass through untouched
    assert_eq!(body["title"], "Shipping &amp; Returns");
    assert_eq!(body["content"], "<p>We ship twice a week.</p>");
}

// ============================================================================
// Response headers
// ============================================================================

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/api/products").send().await.expect("request failed");

    assert_eq!(
        resp.headers()
            .get("x-content-type-options")
            .and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
    assert_eq!(
        resp.headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .get("/api/products")
        .header("x-request-id", "test-trace-42")
        .send()
        .await
        .expect("request failed");

    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("test-trace-42")
    );
}
