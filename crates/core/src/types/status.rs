//! Status enums for various entities.
//!
//! These mirror the status vocabularies of the WooCommerce REST API. The
//! storefront never drives these state machines itself - WooCommerce owns
//! every transition - but typed statuses keep the gateway honest about what
//! it forwards.

use serde::{Deserialize, Serialize};

/// Order status.
///
/// Maps to WooCommerce's order status slugs (`pending`, `on-hold`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    Trash,
}

impl OrderStatus {
    /// Whether the order has reached a terminal state upstream.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::Refunded | Self::Failed | Self::Trash
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slug = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
            Self::Trash => "trash",
        };
        write!(f, "{slug}")
    }
}

/// Product stock status.
///
/// Maps to WooCommerce's `stock_status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    #[default]
    Instock,
    Outofstock,
    Onbackorder,
}

impl StockStatus {
    /// Whether a line with this status can be carried through checkout.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        matches!(self, Self::Instock | Self::Onbackorder)
    }
}

/// Product catalog visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogVisibility {
    #[default]
    Visible,
    Catalog,
    Search,
    Hidden,
}
