//! Wire-to-domain conversion functions.
//!
//! The only place `rest::wire` types are taken apart. Shared parsing helpers
//! for WooCommerce's stringly-typed fields live here.

mod categories;
mod orders;
mod products;

pub use categories::convert_category;
pub use orders::{convert_address, convert_coupon, convert_customer, convert_order};
pub use products::{convert_image, convert_product, convert_variation};

use chrono::{DateTime, NaiveDateTime, Utc};
use wicker_core::{CurrencyCode, OrderStatus, Price, StockStatus};

use crate::woo::WooError;

/// Parse a WooCommerce money string. Empty strings mean "no price here"
/// (variable products without a resolved price), not zero.
pub(crate) fn parse_price(
    raw: &str,
    currency: CurrencyCode,
) -> Result<Option<Price>, WooError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Price::parse(raw, currency)
        .map(Some)
        .map_err(|e| WooError::Parse(format!("bad price {raw:?}: {e}")))
}

/// Parse a required money string, treating empty as zero (order totals).
pub(crate) fn parse_total(raw: &str, currency: CurrencyCode) -> Result<Price, WooError> {
    Ok(parse_price(raw, currency)?.unwrap_or_else(|| Price::zero(currency)))
}

/// Parse a `_gmt` datetime (`2024-11-05T09:30:00`, no offset, UTC by contract).
pub(crate) fn parse_gmt(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse a stock status slug, falling back to in-stock on unknown values.
pub(crate) fn parse_stock_status(raw: &str) -> StockStatus {
    match raw {
        "outofstock" => StockStatus::Outofstock,
        "onbackorder" => StockStatus::Onbackorder,
        "instock" => StockStatus::Instock,
        other => {
            tracing::warn!(status = other, "Unknown stock status from upstream");
            StockStatus::Instock
        }
    }
}

/// Parse an order status slug, falling back to pending on unknown values.
pub(crate) fn parse_order_status(raw: &str) -> OrderStatus {
    match raw {
        "pending" => OrderStatus::Pending,
        "processing" => OrderStatus::Processing,
        "on-hold" => OrderStatus::OnHold,
        "completed" => OrderStatus::Completed,
        "cancelled" => OrderStatus::Cancelled,
        "refunded" => OrderStatus::Refunded,
        "failed" => OrderStatus::Failed,
        "trash" => OrderStatus::Trash,
        other => {
            // Plugins register custom statuses; treat them as open orders
            tracing::warn!(status = other, "Unknown order status from upstream");
            OrderStatus::Pending
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_empty_is_none() {
        assert!(
            parse_price("", CurrencyCode::USD).unwrap().is_none()
        );
        assert!(
            parse_price("  ", CurrencyCode::USD).unwrap().is_none()
        );
    }

    #[test]
    fn test_parse_price_valid() {
        let price = parse_price("12.50", CurrencyCode::USD).unwrap().unwrap();
        assert_eq!(price.display(), "$12.50");
    }

    #[test]
    fn test_parse_price_garbage_is_error() {
        assert!(parse_price("12,50", CurrencyCode::USD).is_err());
    }

    #[test]
    fn test_parse_total_empty_is_zero() {
        let price = parse_total("", CurrencyCode::USD).unwrap();
        assert_eq!(price.display(), "$0.00");
    }

    #[test]
    fn test_parse_gmt() {
        let parsed = parse_gmt(Some("2024-11-05T09:30:00")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-11-05T09:30:00+00:00");
        assert!(parse_gmt(None).is_none());
        assert!(parse_gmt(Some("not-a-date")).is_none());
    }

    #[test]
    fn test_parse_stock_status() {
        assert_eq!(parse_stock_status("instock"), StockStatus::Instock);
        assert_eq!(parse_stock_status("outofstock"), StockStatus::Outofstock);
        assert_eq!(parse_stock_status("onbackorder"), StockStatus::Onbackorder);
        // Unknown values degrade to in-stock rather than failing the page
        assert_eq!(parse_stock_status("mystery"), StockStatus::Instock);
    }

    #[test]
    fn test_parse_order_status() {
        assert_eq!(parse_order_status("on-hold"), OrderStatus::OnHold);
        assert_eq!(parse_order_status("wc-custom"), OrderStatus::Pending);
    }
}
