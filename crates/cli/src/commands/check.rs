//! Configuration validation command.
//!
//! Loads the full environment configuration exactly the way the server does
//! (including secret placeholder/entropy checks) and reports what it found,
//! with secrets redacted by the config type's `Debug` impls.

use wicker_storefront::config::StorefrontConfig;

/// Load and validate the configuration.
///
/// # Errors
///
/// Returns an error if any required variable is missing or fails validation.
pub fn config() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!(bind = %config.socket_addr(), "Configuration valid");
    tracing::info!(upstream = %config.woocommerce.url, namespace = %config.woocommerce.api_version, "WooCommerce upstream");
    tracing::info!(
        cache_ttl_secs = config.woocommerce.cache_ttl.as_secs(),
        idempotency_ttl_secs = config.checkout.idempotency_ttl.as_secs(),
        lock_ttl_secs = config.checkout.order_lock_ttl.as_secs(),
        "Tunables"
    );
    if config.allowed_origins.is_empty() {
        tracing::warn!("No STOREFRONT_ALLOWED_ORIGINS set; cross-origin browsers will be blocked");
    }
    if config.sentry_dsn.is_none() {
        tracing::warn!("No SENTRY_DSN set; error tracking disabled");
    }

    Ok(())
}
