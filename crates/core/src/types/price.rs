//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers (`109.95`). They are parsed straight
//! into a [`Decimal`] so that line totals and cart totals never pick up
//! binary floating point noise.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in the store currency (US dollars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Scale by a rate (e.g. a tax rate), rounded half-up to cents.
    #[must_use]
    pub fn scaled(self, rate: Decimal) -> Self {
        Self(
            self.0
                .saturating_mul(rate)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at `Decimal::MAX`.
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn test_times_quantity() {
        let price = Price::from_cents(10_995);
        assert_eq!(price.times(3), Price::from_cents(32_985));
        assert_eq!(price.times(0), Price::ZERO);
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let huge = Price::new(Decimal::MAX / Decimal::TEN);
        assert_eq!(huge.times(1000), Price::new(Decimal::MAX));
        assert_eq!(Price::new(Decimal::MAX) + huge, Price::new(Decimal::MAX));

        let total: Price = [huge.times(1000), huge.times(3)].into_iter().sum();
        assert_eq!(total, Price::new(Decimal::MAX));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(150), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(400));
    }

    #[test]
    fn test_scaled_rounds_to_cents() {
        let subtotal = Price::from_cents(10_995);
        // 109.95 * 0.08 = 8.796
        assert_eq!(subtotal.scaled(Decimal::new(8, 2)), Price::from_cents(880));
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("109.95").unwrap();
        assert_eq!(price, Price::from_cents(10_995));
    }

    #[test]
    fn test_deserialize_from_json_integer() {
        let price: Price = serde_json::from_str("10").unwrap();
        assert_eq!(price.to_string(), "$10.00");
    }
}
