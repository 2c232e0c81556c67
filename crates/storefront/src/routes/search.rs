//! Search route handlers.
//!
//! Search is fully delegated to the upstream's `?search=` filtering; results
//! are never cached (see the client).

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::woo::ProductQuery;
use crate::woo::types::{Page, Product};

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Search products.
#[instrument(skip(state), fields(q = %params.q))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<Product>>> {
    let term = params.q.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest(
            "Search query must not be empty".to_string(),
        ));
    }

    let query = ProductQuery {
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(0),
        search: Some(term.to_string()),
        ..ProductQuery::default()
    };
    let results = state.woo().list_products(&query).await?;

    Ok(Json(results))
}
