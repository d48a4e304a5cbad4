// 1.0: primitives. money amounts, rates and category labels.
// each is a newtype so the compiler catches a rate passed where money was expected.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

// 1.1: monetary amount. costs, prices, profits all use this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn add(&self, other: Money) -> Self {
        Self(self.0 + other.0)
    }

    pub fn sub(&self, other: Money) -> Self {
        Self(self.0 - other.0)
    }

    pub fn mul(&self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }

    // zero divisor yields zero. callers that care check first.
    pub fn div(&self, divisor: Decimal) -> Self {
        if divisor.is_zero() {
            return Self::zero();
        }
        Self(self.0 / divisor)
    }

    pub fn saturating_add(&self, other: Money) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    // checked forms return None when the result leaves Decimal's range
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_mul(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    pub fn checked_div(&self, divisor: Decimal) -> Option<Self> {
        self.0.checked_div(divisor).map(Self)
    }

    pub fn checked_times(&self, quantity: u64) -> Option<Self> {
        self.checked_mul(Decimal::from(quantity))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc.add(m))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc.add(*m))
    }
}

// 1.2: rate as a fraction. 0.25 = 25%. bounds depend on the policy using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Rate(Decimal);

impl Rate {
    pub fn new(fraction: Decimal) -> Self {
        Self(fraction)
    }

    pub fn from_percent(percent: Decimal) -> Self {
        Self(percent / dec!(100))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn as_percent(&self) -> Decimal {
        self.0 * dec!(100)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

// 1.3: product category. stored uppercased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub const DEFAULT: &'static str = "DEFAULT";

    pub fn new(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        Self(trimmed.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl Default for Category {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self::new(&label)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_arithmetic() {
        let cost = Money::new(dec!(10));
        let fixed = Money::new(dec!(2.5));
        assert_eq!(cost.add(fixed).value(), dec!(12.5));
        assert_eq!(cost.sub(fixed).value(), dec!(7.5));
        assert_eq!(cost.checked_times(3).unwrap().value(), dec!(30));
        assert_eq!(cost.div(dec!(4)).value(), dec!(2.5));
    }

    #[test]
    fn money_checked_ops_catch_overflow() {
        let big = Money::new(Decimal::MAX);
        assert_eq!(big.checked_add(Money::new(dec!(1))), None);
        assert_eq!(Money::new(dec!(10_000_000_000)).checked_times(u64::MAX), None);
        assert_eq!(big.checked_div(dec!(0.5)), None);
        assert_eq!(big.saturating_add(Money::new(dec!(1))), big);
    }

    #[test]
    fn money_div_by_zero_is_zero() {
        assert!(Money::new(dec!(9300)).div(Decimal::ZERO).is_zero());
    }

    #[test]
    fn money_sum() {
        let amounts = [Money::new(dec!(1)), Money::new(dec!(2.25)), Money::new(dec!(3))];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.value(), dec!(6.25));
    }

    #[test]
    fn rate_percent_conversion() {
        assert_eq!(Rate::new(dec!(0.25)).as_percent(), dec!(25));
        assert_eq!(Rate::from_percent(dec!(30)).value(), dec!(0.3));
    }

    #[test]
    fn category_is_uppercased() {
        assert_eq!(Category::new("bebidas").as_str(), "BEBIDAS");
        assert_eq!(Category::new("  Frios ").as_str(), "FRIOS");
        assert!(Category::new("").is_default());
        assert_eq!(Category::from("BeBiDaS"), Category::new("BEBIDAS"));
    }
}
