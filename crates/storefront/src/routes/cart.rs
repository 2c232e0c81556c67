//! Cart route handlers.
//!
//! The cart lives in the session; every mutation saves it back and responds
//! with the freshly hydrated view so the frontend never has to diff state.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use wicker_core::{ProductId, VariationId};

use crate::error::Result;
use crate::models::session::SessionCart;
use crate::models::session_keys;
use crate::services::cart::{CartAdjustment, CartView};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to empty.
pub async fn load_cart(session: &Session) -> Result<SessionCart> {
    Ok(session
        .get::<SessionCart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Save the cart back to the session.
pub async fn save_cart(session: &Session, cart: &SessionCart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub quantity: Option<u32>,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateItemBody {
    pub quantity: u32,
}

/// Coupon request body (apply and remove).
#[derive(Debug, Deserialize)]
pub struct CouponBody {
    pub code: String,
}

/// Sync response: what changed plus the corrected cart.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub adjustments: Vec<CartAdjustment>,
    pub cart: CartView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Hydrated cart view.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    let view = state.cart().hydrate(&cart).await?;
    Ok(Json(view))
}

/// Add a line to the cart.
#[instrument(skip(state, session))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddItemBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;

    state
        .cart()
        .add_line(
            &mut cart,
            body.product_id,
            body.variation_id,
            body.quantity.unwrap_or(1),
        )
        .await?;

    save_cart(&session, &cart).await?;
    let view = state.cart().hydrate(&cart).await?;
    Ok(Json(view))
}

/// Update a line's quantity.
#[instrument(skip(state, session))]
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    Path(key): Path<String>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;

    state.cart().update_quantity(&mut cart, &key, body.quantity)?;

    save_cart(&session, &cart).await?;
    let view = state.cart().hydrate(&cart).await?;
    Ok(Json(view))
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Path(key): Path<String>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;

    state.cart().remove_line(&mut cart, &key)?;

    save_cart(&session, &cart).await?;
    let view = state.cart().hydrate(&cart).await?;
    Ok(Json(view))
}

/// Apply a coupon code.
#[instrument(skip(state, session))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CouponBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;

    state.cart().apply_coupon(&mut cart, body.code.trim()).await?;

    save_cart(&session, &cart).await?;
    let view = state.cart().hydrate(&cart).await?;
    Ok(Json(view))
}

/// Remove a coupon code.
#[instrument(skip(state, session))]
pub async fn remove_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CouponBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;

    state.cart().remove_coupon(&mut cart, body.code.trim());

    save_cart(&session, &cart).await?;
    let view = state.cart().hydrate(&cart).await?;
    Ok(Json(view))
}

/// Revalidate the cart against live product data.
#[instrument(skip(state, session))]
pub async fn sync(State(state): State<AppState>, session: Session) -> Result<Json<SyncReport>> {
    let mut cart = load_cart(&session).await?;

    let adjustments = state.cart().sync(&mut cart).await?;

    save_cart(&session, &cart).await?;
    let view = state.cart().hydrate(&cart).await?;

    Ok(Json(SyncReport {
        adjustments,
        cart: view,
    }))
}
