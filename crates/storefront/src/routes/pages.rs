//! CMS content route handlers (WordPress wp/v2 passthrough).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;
use crate::woo::types::ContentItem;

/// Blog listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// CMS page by slug.
#[instrument(skip(state))]
pub async fn page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ContentItem>> {
    Ok(Json(state.content().get_page_by_slug(&slug).await?))
}

/// Blog post listing, newest first.
#[instrument(skip(state))]
pub async fn posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> Result<Json<Vec<ContentItem>>> {
    let posts = state
        .content()
        .list_posts(params.page.unwrap_or(1), params.per_page.unwrap_or(10))
        .await?;
    Ok(Json(posts))
}

/// Blog post by slug.
#[instrument(skip(state))]
pub async fn post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ContentItem>> {
    Ok(Json(state.content().get_post_by_slug(&slug).await?))
}
