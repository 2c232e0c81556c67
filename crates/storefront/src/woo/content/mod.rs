//! WordPress content API client (`/wp-json/wp/v2`).
//!
//! Serves the CMS surfaces of the storefront: static pages (about, shipping
//! policy) and the blog. Public endpoints, no auth. Rendered HTML is passed
//! through untouched - the upstream editor owns it.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::WooCommerceConfig;
use crate::woo::WooError;
use crate::woo::rest::conversions::parse_gmt;
use crate::woo::rest::wire::WireContent;
use crate::woo::types::ContentItem;

/// Client for the WordPress content API.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, ContentItem>,
}

impl ContentClient {
    /// Create a new content API client.
    #[must_use]
    pub fn new(config: &WooCommerceConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(200)
            .time_to_live(config.cache_ttl.max(Duration::from_secs(60)))
            .build();

        Self {
            inner: Arc::new(ContentClientInner {
                client: reqwest::Client::new(),
                base_url: config.url.clone(),
                cache,
            }),
        }
    }

    fn wp_url(&self, path: &str) -> String {
        format!("{}/wp-json/wp/v2/{path}", self.inner.base_url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, WooError> {
        let response = self.inner.client.get(url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WooError::Api {
                status: status.as_u16(),
                code: "wp_content_error".to_string(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse WordPress content response"
            );
            WooError::Parse(e.to_string())
        })
    }

    async fn get_by_slug(&self, resource: &str, slug: &str) -> Result<ContentItem, WooError> {
        let cache_key = format!("{resource}:{slug}");

        if let Some(item) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for content");
            return Ok(item);
        }

        let params = [("slug", slug.to_string())];
        let wires: Vec<WireContent> = self.get(&self.wp_url(resource), &params).await?;

        let item = wires
            .into_iter()
            .next()
            .map(convert_content)
            .ok_or_else(|| WooError::NotFound(format!("Content not found: {slug}")))?;

        self.inner.cache.insert(cache_key, item.clone()).await;

        Ok(item)
    }

    /// Get a CMS page by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is not found or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_page_by_slug(&self, slug: &str) -> Result<ContentItem, WooError> {
        self.get_by_slug("pages", slug).await
    }

    /// Get a blog post by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the post is not found or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<ContentItem, WooError> {
        self.get_by_slug("posts", slug).await
    }

    /// List published blog posts, newest first. Not cached: the listing is
    /// cheap and paging through stale indexes confuses infinite scroll.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_posts(&self, page: u32, per_page: u32) -> Result<Vec<ContentItem>, WooError> {
        let params = [
            ("page", page.max(1).to_string()),
            ("per_page", per_page.clamp(1, 100).to_string()),
            ("orderby", "date".to_string()),
            ("order", "desc".to_string()),
        ];
        let wires: Vec<WireContent> = self.get(&self.wp_url("posts"), &params).await?;
        Ok(wires.into_iter().map(convert_content).collect())
    }
}

fn convert_content(wire: WireContent) -> ContentItem {
    ContentItem {
        id: wire.id,
        slug: wire.slug,
        title: wire.title.rendered,
        content: wire.content.rendered,
        excerpt: wire.excerpt.map(|e| e.rendered).unwrap_or_default(),
        date: parse_gmt(wire.date_gmt.as_deref()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_content() {
        let wire: WireContent = serde_json::from_value(serde_json::json!({
            "id": 12,
            "slug": "shipping-policy",
            "date_gmt": "2025-01-15T08:00:00",
            "title": {"rendered": "Shipping &amp; Returns"},
            "content": {"rendered": "<p>We ship twice a week.</p>"},
            "excerpt": {"rendered": "<p>We ship twice a week.</p>"}
        }))
        .unwrap();

        let item = convert_content(wire);
        assert_eq!(item.slug, "shipping-policy");
        // Rendered HTML passes through untouched, entities included
        assert_eq!(item.title, "Shipping &amp; Returns");
        assert!(item.date.is_some());
    }

    #[test]
    fn test_convert_content_without_excerpt() {
        let wire: WireContent = serde_json::from_value(serde_json::json!({
            "id": 13,
            "slug": "about",
            "title": {"rendered": "About"},
            "content": {"rendered": "<p>Hi.</p>"}
        }))
        .unwrap();

        let item = convert_content(wire);
        assert_eq!(item.excerpt, "");
        assert!(item.date.is_none());
    }
}
