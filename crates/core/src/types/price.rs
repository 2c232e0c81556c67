//! Type-safe price representation using decimal arithmetic.
//!
//! WooCommerce serializes every monetary amount as a plain decimal string
//! (`"19.99"`), with the currency reported separately on the order or in the
//! store settings. [`Price`] pairs the two and keeps the arithmetic in
//! `rust_decimal` so display subtotals never go through floats.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount string is not a valid decimal.
    #[error("invalid decimal amount: {0}")]
    InvalidAmount(String),
    /// The price is negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Parse a price from a WooCommerce decimal string (e.g., `"19.99"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid decimal or the amount
    /// is negative.
    pub fn parse(amount: &str, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        let amount: Decimal = amount
            .trim()
            .parse()
            .map_err(|_| PriceError::InvalidAmount(amount.to_owned()))?;

        if amount.is_sign_negative() {
            return Err(PriceError::Negative(amount));
        }

        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Multiply by a quantity, for display subtotals.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code,
        }
    }

    /// Add another price of the same currency. Returns `None` on a
    /// currency mismatch.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.currency_code != other.currency_code {
            return None;
        }
        Some(Self {
            amount: self.amount + other.amount,
            currency_code: self.currency_code,
        })
    }

    /// Format for display (e.g., `"$19.99"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The currency's display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let price = Price::parse("19.99", CurrencyCode::USD).unwrap();
        assert_eq!(price.amount, Decimal::new(1999, 2));
        assert_eq!(price.display(), "$19.99");
    }

    #[test]
    fn test_parse_whole_number() {
        let price = Price::parse("25", CurrencyCode::EUR).unwrap();
        assert_eq!(price.display(), "\u{20ac}25.00");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            Price::parse("not-a-price", CurrencyCode::USD),
            Err(PriceError::InvalidAmount(_))
        ));
        assert!(matches!(
            Price::parse("", CurrencyCode::USD),
            Err(PriceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_negative() {
        assert!(matches!(
            Price::parse("-5.00", CurrencyCode::USD),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_times() {
        let price = Price::parse("3.50", CurrencyCode::USD).unwrap();
        assert_eq!(price.times(3).display(), "$10.50");
    }

    #[test]
    fn test_checked_add_same_currency() {
        let a = Price::parse("1.25", CurrencyCode::USD).unwrap();
        let b = Price::parse("2.75", CurrencyCode::USD).unwrap();
        assert_eq!(a.checked_add(&b).unwrap().display(), "$4.00");
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Price::parse("1.25", CurrencyCode::USD).unwrap();
        let b = Price::parse("2.75", CurrencyCode::GBP).unwrap();
        assert!(a.checked_add(&b).is_none());
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
