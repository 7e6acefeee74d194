//! Percentage discount attached to a catalog product.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Discount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscountError {
    /// The percentage lies outside `0..=100`.
    #[error("discount must be between 0 and {max} percent (got {value})")]
    OutOfRange {
        /// Maximum allowed percentage.
        max: u8,
        /// The rejected value.
        value: i64,
    },
}

/// A whole-number percentage discount in the range `0..=100`.
///
/// Zero means "no discount". Because the percentage can never exceed 100,
/// applying a discount to a non-negative price never yields a negative price.
///
/// ## Examples
///
/// ```
/// use bloom_core::Discount;
/// use rust_decimal::Decimal;
///
/// let ten = Discount::new(10).unwrap();
/// assert_eq!(ten.apply(Decimal::from(1000)), Decimal::from(900));
///
/// assert!(Discount::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Discount(u8);

impl Discount {
    /// Largest valid percentage.
    pub const MAX_PERCENT: u8 = 100;

    /// No discount.
    pub const NONE: Self = Self(0);

    /// Create a discount from a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::OutOfRange`] if `percent` is greater than 100.
    pub const fn new(percent: u8) -> Result<Self, DiscountError> {
        if percent > Self::MAX_PERCENT {
            return Err(DiscountError::OutOfRange {
                max: Self::MAX_PERCENT,
                value: percent as i64,
            });
        }
        Ok(Self(percent))
    }

    /// The percentage as an integer.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// Whether this discount changes the price at all.
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.0 > 0
    }

    /// Apply the discount to a unit price: `price * (1 - percent / 100)`.
    #[must_use]
    pub fn apply(self, price: Decimal) -> Decimal {
        if !self.is_active() {
            return price;
        }
        let remaining = Decimal::ONE - Decimal::from(self.0) / Decimal::ONE_HUNDRED;
        price * remaining
    }
}

impl TryFrom<i64> for Discount {
    type Error = DiscountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|p| *p <= Self::MAX_PERCENT)
            .map(Self)
            .ok_or(DiscountError::OutOfRange {
                max: Self::MAX_PERCENT,
                value,
            })
    }
}

impl From<Discount> for i64 {
    fn from(discount: Discount) -> Self {
        Self::from(discount.0)
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_discount_returns_price_unchanged() {
        let price = Decimal::new(49_999, 2);
        assert_eq!(Discount::NONE.apply(price), price);
    }

    #[test]
    fn test_full_discount_is_free() {
        let full = Discount::new(100).unwrap();
        assert_eq!(full.apply(Decimal::from(250)), Decimal::ZERO);
    }

    #[test]
    fn test_partial_discount_is_exact() {
        let d = Discount::new(15).unwrap();
        assert_eq!(d.apply(Decimal::new(1999, 2)), Decimal::new(169_915, 4));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            Discount::new(120),
            Err(DiscountError::OutOfRange { value: 120, .. })
        ));
        assert!(Discount::try_from(-5).is_err());
    }

    #[test]
    fn test_deserialize_validates_range() {
        let ok: Discount = serde_json::from_str("25").unwrap();
        assert_eq!(ok.percent(), 25);
        assert!(serde_json::from_str::<Discount>("150").is_err());
        assert!(serde_json::from_str::<Discount>("-1").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Discount::new(10).unwrap().to_string(), "10%");
    }
}
