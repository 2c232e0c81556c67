//! Session cart and the cart synchronization/validation layer.
//!
//! The cart is session state: lines of `{product_id, variation_id, quantity}`
//! plus applied coupon codes. WooCommerce owns all real pricing, tax, and
//! coupon math at order creation; everything priced here is display-only,
//! assembled from live product data.
//!
//! [`CartService::sync`] is the validation pass: it revalidates every line
//! against the upstream and reports per-line adjustments (removed, out of
//! stock, quantity clamped, price drift, dropped coupons) instead of failing
//! the whole cart.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;
use wicker_core::{Price, ProductId, VariationId};

use crate::models::session::{CartLine, SessionCart};
use crate::woo::types::{Image, Product, Variation};
use crate::woo::{WooClient, WooError};

/// Hard cap on a single line's quantity.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Errors that can occur in cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Upstream lookup failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] WooError),

    /// No line with the given key exists in the cart.
    #[error("Cart line not found: {0}")]
    LineNotFound(String),

    /// Quantity outside 1..={MAX_LINE_QUANTITY}.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Product exists but cannot be purchased right now.
    #[error("Not available for purchase: {0}")]
    NotPurchasable(String),

    /// Coupon exists but is not currently usable.
    #[error("{0}")]
    CouponRejected(String),
}

// =============================================================================
// Views (what the browser sees)
// =============================================================================

/// A hydrated cart line.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub key: String,
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<VariationId>,
    pub name: String,
    pub slug: String,
    /// Variation attributes joined for display (e.g., "Large / Oat").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_label: Option<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_subtotal: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

/// The hydrated cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub coupon_codes: Vec<String>,
    pub item_count: u32,
    /// Display subtotal summed from live unit prices. The upstream computes
    /// the authoritative totals at order creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Price>,
}

impl CartView {
    /// An empty cart view.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            coupon_codes: Vec::new(),
            item_count: 0,
            subtotal: None,
        }
    }
}

// =============================================================================
// Sync Adjustments
// =============================================================================

/// A per-line (or per-coupon) adjustment reported by cart sync.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartAdjustment {
    /// Product deleted or no longer purchasable; line removed.
    Removed { key: String, product_id: ProductId },
    /// Product out of stock; line removed.
    OutOfStock { key: String, product_id: ProductId },
    /// Requested quantity exceeds remaining stock; quantity reduced.
    QuantityClamped {
        key: String,
        product_id: ProductId,
        from: u32,
        to: u32,
    },
    /// Unit price drifted since the line was added; line keeps the live price.
    PriceChanged {
        key: String,
        product_id: ProductId,
        from: Price,
        to: Price,
    },
    /// Applied coupon no longer exists or is no longer usable; code dropped.
    CouponDropped { code: String, reason: String },
}

// =============================================================================
// CartService
// =============================================================================

/// Cart operations over the session cart.
///
/// Stateless: all cart state lives in the caller's session; this service
/// only talks to the upstream for validation and hydration.
#[derive(Clone)]
pub struct CartService {
    woo: WooClient,
}

/// Live pricing/stock snapshot for one line.
struct LineSnapshot {
    product: Product,
    variation: Option<Variation>,
}

impl LineSnapshot {
    fn unit_price(&self) -> Option<Price> {
        self.variation
            .as_ref()
            .map_or_else(|| self.product.price, |v| v.price)
    }

    fn purchasable(&self) -> bool {
        match &self.variation {
            Some(variation) => {
                self.product.purchasable
                    && variation.purchasable
                    && variation.stock_status.is_purchasable()
            }
            None => self.product.is_purchasable(),
        }
    }

    fn out_of_stock(&self) -> bool {
        match &self.variation {
            Some(variation) => !variation.stock_status.is_purchasable(),
            None => !self.product.stock_status.is_purchasable(),
        }
    }

    fn stock_quantity(&self) -> Option<i64> {
        match &self.variation {
            Some(variation) => variation.stock_quantity,
            None if self.product.manages_stock => self.product.stock_quantity,
            None => None,
        }
    }
}

impl CartService {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(woo: WooClient) -> Self {
        Self { woo }
    }

    async fn snapshot(
        &self,
        product_id: ProductId,
        variation_id: Option<VariationId>,
    ) -> Result<LineSnapshot, WooError> {
        let product = self.woo.get_product(product_id).await?;
        let variation = match variation_id {
            Some(id) => Some(self.woo.get_variation(product_id, id).await?),
            None => None,
        };
        Ok(LineSnapshot { product, variation })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a line to the cart, merging with an existing line for the same
    /// purchasable. The live unit price is recorded on the line so sync can
    /// report drift later.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is out of range, the product does not
    /// exist, or it is not purchasable right now.
    #[instrument(skip(self, cart), fields(product_id = %product_id))]
    pub async fn add_line(
        &self,
        cart: &mut SessionCart,
        product_id: ProductId,
        variation_id: Option<VariationId>,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 || quantity > MAX_LINE_QUANTITY {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let snapshot = self.snapshot(product_id, variation_id).await?;
        if !snapshot.purchasable() {
            return Err(CartError::NotPurchasable(snapshot.product.name));
        }

        let unit_price = snapshot.unit_price();

        if let Some(line) = cart
            .lines
            .iter_mut()
            .find(|line| line.same_item(product_id, variation_id))
        {
            line.quantity = (line.quantity + quantity).min(MAX_LINE_QUANTITY);
            line.unit_price = unit_price;
        } else {
            cart.lines.push(CartLine {
                key: Uuid::new_v4().to_string(),
                product_id,
                variation_id,
                quantity,
                unit_price,
            });
        }

        Ok(())
    }

    /// Update a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is out of range or the line key is
    /// unknown.
    pub fn update_quantity(
        &self,
        cart: &mut SessionCart,
        key: &str,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 || quantity > MAX_LINE_QUANTITY {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let line = cart
            .lines
            .iter_mut()
            .find(|line| line.key == key)
            .ok_or_else(|| CartError::LineNotFound(key.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line key is unknown.
    pub fn remove_line(&self, cart: &mut SessionCart, key: &str) -> Result<(), CartError> {
        let before = cart.lines.len();
        cart.lines.retain(|line| line.key != key);
        if cart.lines.len() == before {
            return Err(CartError::LineNotFound(key.to_string()));
        }
        Ok(())
    }

    /// Apply a coupon code after checking existence and basic usability
    /// upstream. The authoritative coupon math happens at order creation.
    ///
    /// # Errors
    ///
    /// Returns an error if the coupon does not exist or is expired/exhausted.
    #[instrument(skip(self, cart), fields(code = %code))]
    pub async fn apply_coupon(&self, cart: &mut SessionCart, code: &str) -> Result<(), CartError> {
        let coupon = self.woo.get_coupon_by_code(code).await?;

        if !coupon.is_usable(Utc::now()) {
            return Err(CartError::CouponRejected(format!(
                "Coupon is expired or has been fully used: {code}"
            )));
        }

        // Store the upstream's canonical casing
        if !cart
            .coupon_codes
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&coupon.code))
        {
            cart.coupon_codes.push(coupon.code);
        }

        Ok(())
    }

    /// Remove a coupon code, if present.
    pub fn remove_coupon(&self, cart: &mut SessionCart, code: &str) {
        cart.coupon_codes.retain(|c| !c.eq_ignore_ascii_case(code));
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Assemble the display view of the cart from live product data.
    ///
    /// Lenient: lines whose product has vanished are skipped here rather than
    /// erroring; [`Self::sync`] is the pass that reports and removes them.
    ///
    /// # Errors
    ///
    /// Returns an error only when the upstream itself fails.
    #[instrument(skip(self, cart))]
    pub async fn hydrate(&self, cart: &SessionCart) -> Result<CartView, CartError> {
        if cart.is_empty() {
            return Ok(CartView {
                coupon_codes: cart.coupon_codes.clone(),
                ..CartView::empty()
            });
        }

        let ids: Vec<ProductId> = cart.lines.iter().map(|line| line.product_id).collect();
        let products = self.woo.get_products_by_ids(&ids).await?;

        let mut lines = Vec::with_capacity(cart.lines.len());
        let mut subtotal: Option<Price> = None;

        for line in &cart.lines {
            let Some(product) = products.iter().find(|p| p.id == line.product_id) else {
                continue;
            };

            let variation = match line.variation_id {
                Some(id) => Some(self.woo.get_variation(line.product_id, id).await?),
                None => None,
            };

            let unit_price = variation
                .as_ref()
                .map_or_else(|| product.price, |v| v.price);
            let line_subtotal = unit_price.map(|p| p.times(line.quantity));

            if let Some(amount) = line_subtotal {
                subtotal = Some(match subtotal {
                    Some(total) => total.checked_add(&amount).unwrap_or(total),
                    None => amount,
                });
            }

            let variant_label = variation.as_ref().map(|v| {
                v.attributes
                    .iter()
                    .map(|a| a.option.as_str())
                    .collect::<Vec<_>>()
                    .join(" / ")
            });

            let image = variation
                .as_ref()
                .and_then(|v| v.image.clone())
                .or_else(|| product.images.first().cloned());

            lines.push(CartLineView {
                key: line.key.clone(),
                product_id: line.product_id,
                variation_id: line.variation_id,
                name: product.name.clone(),
                slug: product.slug.clone(),
                variant_label,
                quantity: line.quantity,
                unit_price,
                line_subtotal,
                image,
            });
        }

        let item_count = lines.iter().map(|line| line.quantity).sum();

        Ok(CartView {
            lines,
            coupon_codes: cart.coupon_codes.clone(),
            item_count,
            subtotal,
        })
    }

    // =========================================================================
    // Synchronization
    // =========================================================================

    /// Revalidate every line and coupon against live upstream data, mutating
    /// the cart in place and reporting what changed.
    ///
    /// # Errors
    ///
    /// Returns an error only when the upstream itself fails; per-line
    /// problems become [`CartAdjustment`]s, not errors.
    #[instrument(skip(self, cart))]
    pub async fn sync(&self, cart: &mut SessionCart) -> Result<Vec<CartAdjustment>, CartError> {
        let mut adjustments = Vec::new();
        let mut kept = Vec::with_capacity(cart.lines.len());

        for mut line in cart.lines.drain(..) {
            let snapshot = match self.snapshot(line.product_id, line.variation_id).await {
                Ok(snapshot) => snapshot,
                Err(e) if e.is_not_found() => {
                    adjustments.push(CartAdjustment::Removed {
                        key: line.key,
                        product_id: line.product_id,
                    });
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if snapshot.out_of_stock() {
                adjustments.push(CartAdjustment::OutOfStock {
                    key: line.key,
                    product_id: line.product_id,
                });
                continue;
            }

            if !snapshot.purchasable() {
                adjustments.push(CartAdjustment::Removed {
                    key: line.key,
                    product_id: line.product_id,
                });
                continue;
            }

            if let Some(stock) = snapshot.stock_quantity() {
                let available = u32::try_from(stock.max(0)).unwrap_or(0);
                if available == 0 {
                    adjustments.push(CartAdjustment::OutOfStock {
                        key: line.key,
                        product_id: line.product_id,
                    });
                    continue;
                }
                if line.quantity > available {
                    adjustments.push(CartAdjustment::QuantityClamped {
                        key: line.key.clone(),
                        product_id: line.product_id,
                        from: line.quantity,
                        to: available,
                    });
                    line.quantity = available;
                }
            }

            let live_price = snapshot.unit_price();
            if let (Some(recorded), Some(live)) = (line.unit_price, live_price)
                && recorded != live
            {
                adjustments.push(CartAdjustment::PriceChanged {
                    key: line.key.clone(),
                    product_id: line.product_id,
                    from: recorded,
                    to: live,
                });
            }
            line.unit_price = live_price;

            kept.push(line);
        }

        cart.lines = kept;

        // Revalidate applied coupons
        let codes = std::mem::take(&mut cart.coupon_codes);
        for code in codes {
            match self.woo.get_coupon_by_code(&code).await {
                Ok(coupon) if coupon.is_usable(Utc::now()) => cart.coupon_codes.push(code),
                Ok(_) => adjustments.push(CartAdjustment::CouponDropped {
                    code,
                    reason: "expired or fully used".to_string(),
                }),
                Err(e) if e.is_not_found() => adjustments.push(CartAdjustment::CouponDropped {
                    code,
                    reason: "no longer exists".to_string(),
                }),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(adjustments)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wicker_core::CurrencyCode;

    fn service() -> CartService {
        use secrecy::SecretString;

        CartService::new(WooClient::new(&crate::config::WooCommerceConfig {
            url: "http://127.0.0.1:9".to_string(),
            api_version: "wc/v3".to_string(),
            consumer_key: "ck_test".to_string(),
            consumer_secret: SecretString::from("cs_test"),
            currency: CurrencyCode::USD,
            cache_ttl: std::time::Duration::from_secs(300),
        }))
    }

    fn cart_with_line(key: &str, quantity: u32) -> SessionCart {
        SessionCart {
            lines: vec![CartLine {
                key: key.to_string(),
                product_id: ProductId::new(101),
                variation_id: None,
                quantity,
                unit_price: None,
            }],
            coupon_codes: vec![],
        }
    }

    #[test]
    fn test_update_quantity() {
        let service = service();
        let mut cart = cart_with_line("k1", 1);

        service.update_quantity(&mut cart, "k1", 5).unwrap();
        assert_eq!(cart.lines.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_update_quantity_rejects_zero_and_excess() {
        let service = service();
        let mut cart = cart_with_line("k1", 1);

        assert!(matches!(
            service.update_quantity(&mut cart, "k1", 0),
            Err(CartError::InvalidQuantity(0))
        ));
        assert!(matches!(
            service.update_quantity(&mut cart, "k1", MAX_LINE_QUANTITY + 1),
            Err(CartError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_update_quantity_unknown_key() {
        let service = service();
        let mut cart = cart_with_line("k1", 1);

        assert!(matches!(
            service.update_quantity(&mut cart, "nope", 2),
            Err(CartError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_remove_line() {
        let service = service();
        let mut cart = cart_with_line("k1", 1);

        service.remove_line(&mut cart, "k1").unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            service.remove_line(&mut cart, "k1"),
            Err(CartError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_remove_coupon_case_insensitive() {
        let service = service();
        let mut cart = SessionCart {
            lines: vec![],
            coupon_codes: vec!["WELCOME10".to_string()],
        };

        service.remove_coupon(&mut cart, "welcome10");
        assert!(cart.coupon_codes.is_empty());
    }

    #[test]
    fn test_adjustment_wire_shape() {
        let adjustment = CartAdjustment::QuantityClamped {
            key: "k1".to_string(),
            product_id: ProductId::new(101),
            from: 5,
            to: 2,
        };
        let json = serde_json::to_value(&adjustment).unwrap();
        assert_eq!(json["kind"], "quantity_clamped");
        assert_eq!(json["from"], 5);
        assert_eq!(json["to"], 2);

        let dropped = CartAdjustment::CouponDropped {
            code: "SPRING".to_string(),
            reason: "no longer exists".to_string(),
        };
        let json = serde_json::to_value(&dropped).unwrap();
        assert_eq!(json["kind"], "coupon_dropped");
        assert_eq!(json["code"], "SPRING");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert!(view.subtotal.is_none());
    }
}
