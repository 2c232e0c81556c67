//! Home page route handler.
//!
//! One aggregate endpoint so the frontend's landing page needs a single
//! round trip: featured products plus the top-level categories.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use wicker_core::CategoryId;

use crate::error::Result;
use crate::state::AppState;
use crate::woo::ProductQuery;
use crate::woo::types::{Category, Product};

const FEATURED_COUNT: u32 = 8;
const CATEGORY_COUNT: u32 = 10;

/// Home page payload.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub featured: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Home page aggregate.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeView>> {
    let featured_query = ProductQuery {
        per_page: FEATURED_COUNT,
        featured: Some(true),
        ..ProductQuery::default()
    };

    let (featured, categories) = tokio::join!(
        state.woo().list_products(&featured_query),
        // parent=0 selects top-level categories
        state
            .woo()
            .list_categories(1, CATEGORY_COUNT, Some(CategoryId::new(0))),
    );

    Ok(Json(HomeView {
        featured: featured?.items,
        categories: categories?.items,
    }))
}
