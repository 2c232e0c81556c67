//! Wishlist route handlers.
//!
//! Wishlists are stored by the upstream storefront plugin and keyed by an
//! opaque share token. The gateway mints one token per session (guests
//! included) and never exposes other tokens' lists.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;
use wicker_core::ProductId;

use crate::error::Result;
use crate::models::session_keys;
use crate::state::AppState;
use crate::woo::types::{Product, WishlistItem};

/// A wishlist entry hydrated with its product (when it still exists).
#[derive(Debug, Serialize)]
pub struct WishlistItemView {
    #[serde(flatten)]
    pub item: WishlistItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// The hydrated wishlist.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<WishlistItemView>,
}

/// Add-to-wishlist request body.
#[derive(Debug, Deserialize)]
pub struct AddWishlistBody {
    pub product_id: ProductId,
}

/// Get or mint the session's wishlist token.
async fn wishlist_token(session: &Session) -> Result<String> {
    if let Some(token) = session
        .get::<String>(session_keys::WISHLIST_TOKEN)
        .await?
    {
        return Ok(token);
    }

    let token = Uuid::new_v4().to_string();
    session
        .insert(session_keys::WISHLIST_TOKEN, &token)
        .await?;
    Ok(token)
}

/// Hydrate wishlist items with their products.
async fn hydrate(state: &AppState, items: Vec<WishlistItem>) -> Result<WishlistView> {
    if items.is_empty() {
        return Ok(WishlistView { items: Vec::new() });
    }

    let ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
    let products = state.woo().get_products_by_ids(&ids).await?;

    let items = items
        .into_iter()
        .map(|item| {
            let product = products.iter().find(|p| p.id == item.product_id).cloned();
            WishlistItemView { item, product }
        })
        .collect();

    Ok(WishlistView { items })
}

/// The session's wishlist.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<WishlistView>> {
    let token = wishlist_token(&session).await?;
    let items = state.woo().get_wishlist(&token).await?;
    Ok(Json(hydrate(&state, items).await?))
}

/// Add a product to the wishlist.
#[instrument(skip(state, session))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddWishlistBody>,
) -> Result<Json<WishlistView>> {
    let token = wishlist_token(&session).await?;
    let items = state
        .woo()
        .add_wishlist_item(&token, body.product_id)
        .await?;
    Ok(Json(hydrate(&state, items).await?))
}

/// Remove a product from the wishlist.
#[instrument(skip(state, session))]
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<i64>,
) -> Result<Json<WishlistView>> {
    let token = wishlist_token(&session).await?;
    let items = state
        .woo()
        .remove_wishlist_item(&token, ProductId::new(product_id))
        .await?;
    Ok(Json(hydrate(&state, items).await?))
}
