//! Cache warming command.
//!
//! Prefetches the first listing pages of products and categories through the
//! client so the first shoppers after a deploy hit a warm cache. Only useful
//! when run inside the serving process's lifetime; as a standalone command it
//! doubles as a load smoke test of the upstream.

use wicker_storefront::config::StorefrontConfig;
use wicker_storefront::woo::{ProductQuery, WooClient};

/// Prefetch `pages` listing pages of products and categories.
///
/// # Errors
///
/// Returns an error if configuration fails to load or any prefetch fails.
pub async fn cache(pages: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let client = WooClient::new(&config.woocommerce);

    let mut products = 0_usize;
    for page in 1..=pages.max(1) {
        let query = ProductQuery {
            page,
            ..ProductQuery::default()
        };
        let result = client.list_products(&query).await?;
        products += result.items.len();
        if page >= result.total_pages {
            break;
        }
    }

    let categories = client.list_categories(1, 0, None).await?;

    tracing::info!(
        products,
        categories = categories.items.len(),
        "Cache warmed"
    );

    Ok(())
}
