//! Category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use wicker_core::CategoryId;

use crate::error::Result;
use crate::state::AppState;
use crate::woo::ProductQuery;
use crate::woo::types::{Category, Page, Product};

/// Category listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Parent category ID; `0` selects top-level categories.
    pub parent: Option<i64>,
}

/// Category detail payload: the category plus a page of its products.
#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub products: Page<Product>,
}

/// Query parameters for the product page inside a category detail.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryProductParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub orderby: Option<String>,
    pub order: Option<String>,
}

/// List categories.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CategoryListParams>,
) -> Result<Json<Page<Category>>> {
    let page = state
        .woo()
        .list_categories(
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(0),
            params.parent.map(CategoryId::new),
        )
        .await?;
    Ok(Json(page))
}

/// Category detail by slug, with the first page of its products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<CategoryProductParams>,
) -> Result<Json<CategoryDetail>> {
    let category = state.woo().get_category_by_slug(&slug).await?;

    let query = ProductQuery {
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(0),
        category: Some(category.id),
        orderby: params.orderby,
        order: params.order,
        ..ProductQuery::default()
    };
    let products = state.woo().list_products(&query).await?;

    Ok(Json(CategoryDetail { category, products }))
}
