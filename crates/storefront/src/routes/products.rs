//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;
use crate::woo::types::{Page, Product, Variation};
use crate::woo::{ProductQuery, WooError};

/// Listing query parameters, as the browser sends them.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Category slug (resolved to an ID upstream-side).
    pub category: Option<String>,
    pub orderby: Option<String>,
    pub order: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub featured: Option<bool>,
    pub on_sale: Option<bool>,
}

impl ProductListParams {
    /// Build the upstream query, resolving the category slug if present.
    async fn into_query(self, state: &AppState) -> Result<ProductQuery> {
        let category = match self.category.as_deref() {
            Some(slug) => Some(state.woo().get_category_by_slug(slug).await?.id),
            None => None,
        };

        Ok(ProductQuery {
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(0),
            category,
            search: None,
            orderby: self.orderby,
            order: self.order,
            min_price: self.min_price,
            max_price: self.max_price,
            featured: self.featured,
            on_sale: self.on_sale,
            include: Vec::new(),
        })
    }
}

/// Product detail payload: the product plus its variations when variable.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub variation_details: Vec<Variation>,
}

/// List products with filters, sorting, and pagination.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Page<Product>>> {
    let query = params.into_query(&state).await?;
    let page = state.woo().list_products(&query).await?;
    Ok(Json(page))
}

/// Product detail by slug, with variations resolved for variable products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = state.woo().get_product_by_slug(&slug).await?;

    let variation_details = if product.variations.is_empty() {
        Vec::new()
    } else {
        state.woo().list_variations(product.id).await?
    };

    Ok(Json(ProductDetail {
        product,
        variation_details,
    }))
}

/// Maximum related products returned.
const RELATED_LIMIT: usize = 8;

/// Related products, as chosen by the upstream's `related_ids`.
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let product = state.woo().get_product_by_slug(&slug).await?;

    let ids: Vec<_> = product.related_ids.into_iter().take(RELATED_LIMIT).collect();
    if ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let related = match state.woo().get_products_by_ids(&ids).await {
        Ok(products) => products,
        // A related product deleted upstream should not break the page
        Err(WooError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(related))
}
