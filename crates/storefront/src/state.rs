//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::cart::CartService;
use crate::services::checkout::CheckoutService;
use crate::woo::{ContentClient, WooClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: the upstream clients, the cart and checkout services,
/// and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    woo: WooClient,
    content: ContentClient,
    cart: CartService,
    checkout: CheckoutService,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let woo = WooClient::new(&config.woocommerce);
        let content = ContentClient::new(&config.woocommerce);
        let cart = CartService::new(woo.clone());
        let checkout = CheckoutService::new(woo.clone(), &config.checkout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                woo,
                content,
                cart,
                checkout,
            }),
        }
    }

    /// Start the periodic TTL sweeps for the checkout guards.
    pub fn start_sweepers(&self) {
        self.inner.checkout.spawn_sweeper();
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the WooCommerce API client.
    #[must_use]
    pub fn woo(&self) -> &WooClient {
        &self.inner.woo
    }

    /// Get a reference to the WordPress content client.
    #[must_use]
    pub fn content(&self) -> &ContentClient {
        &self.inner.content
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
