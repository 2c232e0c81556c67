//! Checkout route handlers.
//!
//! `POST /api/checkout` is the one route that mutates upstream state. It is
//! guarded three ways: a sync pass that refuses to submit a drifted cart, the
//! per-session submit lock, and the `Idempotency-Key` replay store.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::OptionalCustomer;
use crate::routes::cart::{load_cart, save_cart};
use crate::services::cart::CartAdjustment;
use crate::services::checkout::CheckoutRequest;
use crate::state::AppState;
use crate::woo::types::{Address, Order, PaymentGateway};

/// Header carrying the client's idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    /// Gateway ID from `/api/checkout/payment-methods`.
    pub payment_method: String,
    pub billing: Address,
    /// Defaults to the billing address.
    pub shipping: Option<Address>,
    pub customer_note: Option<String>,
}

/// Successful checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    /// True when this response was replayed from the idempotency store.
    pub replayed: bool,
}

/// Enabled payment gateways.
#[instrument(skip(state))]
pub async fn payment_methods(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentGateway>>> {
    Ok(Json(state.woo().list_payment_gateways().await?))
}

/// Submit the cart as an order.
///
/// A cart that drifted since the shopper last saw it (stock, price, coupons)
/// is not submitted: the response is a `409` carrying the adjustments and
/// the corrected cart for the frontend to re-confirm.
#[instrument(skip(state, session, customer, headers, body))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
    headers: HeaderMap,
    Json(body): Json<CheckoutBody>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    // Validation pass first: never submit a cart the shopper hasn't seen
    let adjustments = state.cart().sync(&mut cart).await?;
    if !adjustments.is_empty() {
        save_cart(&session, &cart).await?;
        return Ok(cart_changed_response(&state, &cart, adjustments).await?);
    }

    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty());

    let session_id = session
        .id()
        .map_or_else(|| "anonymous".to_string(), |id| id.to_string());

    let outcome = state
        .checkout()
        .submit(
            &session_id,
            idempotency_key,
            &mut cart,
            customer.as_ref(),
            CheckoutRequest {
                payment_method: body.payment_method,
                billing: body.billing,
                shipping: body.shipping,
                customer_note: body.customer_note,
            },
        )
        .await?;

    // The service cleared the cart on success
    save_cart(&session, &cart).await?;

    let status = if outcome.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(CheckoutResponse {
            order: outcome.order,
            replayed: outcome.replayed,
        }),
    )
        .into_response())
}

/// Build the 409 response for a cart that changed during validation.
async fn cart_changed_response(
    state: &AppState,
    cart: &crate::models::session::SessionCart,
    adjustments: Vec<CartAdjustment>,
) -> Result<Response> {
    let view = state.cart().hydrate(cart).await?;

    Ok((
        StatusCode::CONFLICT,
        Json(json!({
            "error": {
                "code": "cart_changed",
                "message": "The cart changed during validation; review and retry",
            },
            "adjustments": adjustments,
            "cart": view,
        })),
    )
        .into_response())
}
