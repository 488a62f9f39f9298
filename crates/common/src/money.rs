//! Money amounts stored as integer cents.

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

/// An amount of money in minor units. Serialized as `{"cents": n}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Converts a decimal major-unit amount such as `10.5`, rounding to the
    /// nearest cent. Older cache writers stored prices this way.
    pub fn from_major(amount: f64) -> Self {
        Self::from_cents((amount * 100.0).round() as i64)
    }

    pub const fn zero() -> Self {
        Self::from_cents(0)
    }

    pub const fn cents(&self) -> i64 {
        self.cents
    }

    pub const fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// The line total for `quantity` units at this unit price.
    pub fn times(self, quantity: u32) -> Money {
        Self::from_cents(self.cents.saturating_mul(i64::from(quantity)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Self::from_cents(iter.map(|m| m.cents).fold(0, i64::saturating_add))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_units_round_to_the_nearest_cent() {
        assert_eq!(Money::from_major(10.0).cents(), 1000);
        assert_eq!(Money::from_major(19.99).cents(), 1999);
        assert_eq!(Money::from_major(2.5).cents(), 250);
    }

    #[test]
    fn renders_as_currency() {
        assert_eq!(Money::from_cents(1234).to_string(), "$12.34");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-$12.34");
    }

    #[test]
    fn line_totals_sum_up() {
        let subtotal = Money::from_cents(1000).times(3);
        assert_eq!(subtotal.cents(), 3000);

        let total: Money = [subtotal, Money::from_cents(250)].into_iter().sum();
        assert_eq!(total.cents(), 3250);
        assert_eq!(std::iter::empty::<Money>().sum::<Money>(), Money::zero());
    }
}
