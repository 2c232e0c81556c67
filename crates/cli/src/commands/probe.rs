//! Upstream reachability probe.

use wicker_storefront::config::StorefrontConfig;
use wicker_storefront::woo::WooClient;

/// Ping the WooCommerce upstream with the configured credentials.
///
/// # Errors
///
/// Returns an error if configuration fails to load, the upstream is
/// unreachable, or the credentials are rejected.
pub async fn ping() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let client = WooClient::new(&config.woocommerce);

    tracing::info!(upstream = %config.woocommerce.url, "Probing upstream...");
    client.ping().await?;
    tracing::info!("Upstream reachable, credentials accepted");

    // One real catalogue read to confirm the data path end to end
    let gateways = client.list_payment_gateways().await?;
    tracing::info!(
        enabled_gateways = gateways.len(),
        "Payment gateways visible"
    );

    Ok(())
}
