//! Checkout orchestration: order submission guarded by idempotency keys and
//! per-session submit locks.
//!
//! The storefront sends WooCommerce the cart's line items, coupon codes, and
//! addresses; the upstream runs the actual pricing, tax, coupon, stock, and
//! payment logic and returns the created order. What lives here is only the
//! request-deduplication around that single upstream call.

mod idempotency;
mod locks;

pub use idempotency::{Begin, IdempotencyStore};
pub use locks::OrderLocks;

use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use crate::config::CheckoutConfig;
use crate::models::session::{CurrentCustomer, SessionCart};
use crate::services::cart::CartError;
use crate::woo::types::{Address, Order};
use crate::woo::{CreateOrderPayload, OrderLinePayload, WooClient, WooError};

/// How often the TTL sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Cart validation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Upstream order creation failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] WooError),

    /// Checkout submitted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The first request with this idempotency key is still running.
    #[error("Idempotency key in flight")]
    InFlight,

    /// Another checkout for this session holds the submit lock.
    #[error("Checkout already in progress for this session")]
    Locked,
}

/// Checkout form data, already deserialized by the route.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Payment gateway ID (from `/api/checkout/payment-methods`).
    pub payment_method: String,
    pub billing: Address,
    /// Defaults to the billing address when absent.
    pub shipping: Option<Address>,
    pub customer_note: Option<String>,
}

/// Result of a checkout submission.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: Order,
    /// Whether this response was replayed from the idempotency store.
    pub replayed: bool,
}

/// Order submission service.
#[derive(Clone)]
pub struct CheckoutService {
    woo: WooClient,
    idempotency: IdempotencyStore,
    locks: OrderLocks,
}

impl CheckoutService {
    /// Create a checkout service with the configured TTLs.
    #[must_use]
    pub fn new(woo: WooClient, config: &CheckoutConfig) -> Self {
        Self {
            woo,
            // A stale in-flight marker should not outlive the submit lock
            idempotency: IdempotencyStore::new(config.idempotency_ttl, config.order_lock_ttl),
            locks: OrderLocks::new(config.order_lock_ttl),
        }
    }

    /// Spawn the periodic sweep that evicts expired idempotency entries and
    /// locks. Runs for the life of the process.
    pub fn spawn_sweeper(&self) {
        let idempotency = self.idempotency.clone();
        let locks = self.locks.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                idempotency.sweep();
                locks.sweep();
                tracing::debug!(
                    idempotency_entries = idempotency.len(),
                    held_locks = locks.len(),
                    "Checkout guard sweep"
                );
            }
        });
    }

    /// Submit the cart as an order.
    ///
    /// A replayed `Idempotency-Key` returns the stored response without
    /// re-submitting upstream. On success the session cart is cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, another submission is running
    /// (same key or same session), or the upstream rejects the order.
    #[instrument(skip_all, fields(session_id = %session_id, customer_id))]
    pub async fn submit(
        &self,
        session_id: &str,
        idempotency_key: Option<&str>,
        cart: &mut SessionCart,
        customer: Option<&CurrentCustomer>,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if let Some(id) = customer.map(|c| c.id) {
            tracing::Span::current().record("customer_id", tracing::field::display(id));
        }

        // Idempotency gate first: after a successful submit the cart is
        // empty, and a client retrying a lost response must get the replay,
        // not an empty-cart error
        if let Some(key) = idempotency_key {
            match self.idempotency.begin(key) {
                Begin::Replay(body) => {
                    let order: Order = serde_json::from_value(body)
                        .map_err(|e| WooError::Parse(format!("stored replay body: {e}")))?;
                    tracing::info!(order_id = %order.id, "Replayed checkout response");
                    cart.lines.clear();
                    cart.coupon_codes.clear();
                    return Ok(CheckoutOutcome {
                        order,
                        replayed: true,
                    });
                }
                Begin::InFlight => return Err(CheckoutError::InFlight),
                Begin::Started => {}
            }
        }

        if cart.is_empty() {
            if let Some(key) = idempotency_key {
                self.idempotency.abandon(key);
            }
            return Err(CheckoutError::EmptyCart);
        }

        if !self.locks.try_acquire(session_id) {
            if let Some(key) = idempotency_key {
                self.idempotency.abandon(key);
            }
            return Err(CheckoutError::Locked);
        }

        let result = self.submit_upstream(cart, customer, request).await;

        match &result {
            Ok(order) => {
                if let Some(key) = idempotency_key
                    && let Ok(body) = serde_json::to_value(order)
                {
                    self.idempotency.complete(key, body);
                }
                cart.lines.clear();
                cart.coupon_codes.clear();
            }
            Err(_) => {
                if let Some(key) = idempotency_key {
                    self.idempotency.abandon(key);
                }
            }
        }

        self.locks.release(session_id);

        result.map(|order| CheckoutOutcome {
            order,
            replayed: false,
        })
    }

    async fn submit_upstream(
        &self,
        cart: &SessionCart,
        customer: Option<&CurrentCustomer>,
        request: CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        let line_items = cart
            .lines
            .iter()
            .map(|line| OrderLinePayload {
                product_id: line.product_id.as_i64(),
                variation_id: line.variation_id.map(|id| id.as_i64()),
                quantity: line.quantity,
            })
            .collect();

        let shipping = request.shipping.unwrap_or_else(|| request.billing.clone());

        let payload = CreateOrderPayload::new(
            request.payment_method,
            customer.map(|c| c.id),
            request.billing,
            shipping,
            line_items,
            cart.coupon_codes.clone(),
            request.customer_note,
        );

        let order = self.woo.create_order(&payload).await?;
        tracing::info!(order_id = %order.id, number = %order.number, "Order created");
        Ok(order)
    }
}
