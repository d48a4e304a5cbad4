//! Fixed-cost ledger.
//!
//! Monthly fixed costs keyed by a free-form label (rent, staff, ...). The
//! ledger total is what the allocation basis spreads over sold units. Labels
//! keep insertion order so exported tables read the way they were entered.

use crate::engine::PricingError;
use crate::types::Money;
use serde::{Deserialize, Serialize};

/// Labels seeded by [`FixedCostLedger::with_standard_labels`].
pub const STANDARD_LABELS: [&str; 6] = ["rent", "electricity", "water", "energy", "staff", "other"];

// serialized as a plain list; loading goes through `set`, so a repeated label keeps its last amount
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FixedCost>", into = "Vec<FixedCost>")]
pub struct FixedCostLedger {
    entries: Vec<FixedCost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCost {
    pub label: String,
    pub monthly_amount: Money,
}

impl FixedCostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with the usual shop cost lines, all at zero.
    pub fn with_standard_labels() -> Self {
        let mut ledger = Self::new();
        for label in STANDARD_LABELS {
            ledger.set(label, Money::zero());
        }
        ledger
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Money)>,
        S: Into<String>,
    {
        let mut ledger = Self::new();
        ledger.replace(entries);
        ledger
    }

    /// Insert or overwrite a single cost line.
    pub fn set(&mut self, label: impl Into<String>, amount: Money) {
        let label = label.into();
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => entry.monthly_amount = amount,
            None => self.entries.push(FixedCost {
                label,
                monthly_amount: amount,
            }),
        }
    }

    /// Replace every cost line at once.
    pub fn replace<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (S, Money)>,
        S: Into<String>,
    {
        self.entries.clear();
        for (label, amount) in entries {
            self.set(label, amount);
        }
    }

    pub fn get(&self, label: &str) -> Option<Money> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.monthly_amount)
    }

    pub fn entries(&self) -> &[FixedCost] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every line. Saturates; `validate` rejects ledgers whose sum overflows.
    pub fn total(&self) -> Money {
        self.entries
            .iter()
            .fold(Money::zero(), |acc, e| acc.saturating_add(e.monthly_amount))
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if let Some(entry) = self.entries.iter().find(|e| e.monthly_amount.is_negative()) {
            return Err(PricingError::InvalidConfiguration {
                reason: format!(
                    "fixed cost '{}' is negative ({})",
                    entry.label, entry.monthly_amount
                ),
            });
        }
        let mut total = Money::zero();
        for entry in &self.entries {
            total = total.checked_add(entry.monthly_amount).ok_or_else(|| {
                PricingError::InvalidConfiguration {
                    reason: format!("fixed costs overflow at '{}'", entry.label),
                }
            })?;
        }
        Ok(())
    }
}

impl From<Vec<FixedCost>> for FixedCostLedger {
    fn from(entries: Vec<FixedCost>) -> Self {
        Self::from_entries(entries.into_iter().map(|e| (e.label, e.monthly_amount)))
    }
}

impl From<FixedCostLedger> for Vec<FixedCost> {
    fn from(ledger: FixedCostLedger) -> Self {
        ledger.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn shop_ledger() -> FixedCostLedger {
        FixedCostLedger::from_entries([
            ("rent", Money::new(dec!(2500))),
            ("electricity", Money::new(dec!(800))),
            ("water", Money::new(dec!(300))),
            ("energy", Money::new(dec!(1200))),
            ("staff", Money::new(dec!(4000))),
            ("other", Money::new(dec!(500))),
        ])
    }

    #[test]
    fn total_sums_every_line() {
        assert_eq!(shop_ledger().total().value(), dec!(9300));
    }

    #[test]
    fn unknown_labels_are_accepted() {
        let mut ledger = shop_ledger();
        ledger.set("security", Money::new(dec!(200)));
        assert_eq!(ledger.total().value(), dec!(9500));
        assert_eq!(ledger.get("security"), Some(Money::new(dec!(200))));
    }

    #[test]
    fn set_overwrites_existing_line() {
        let mut ledger = shop_ledger();
        ledger.set("rent", Money::new(dec!(3000)));
        assert_eq!(ledger.entries().len(), 6);
        assert_eq!(ledger.total().value(), dec!(9800));
    }

    #[test]
    fn replace_is_wholesale() {
        let mut ledger = shop_ledger();
        ledger.replace([("rent", Money::new(dec!(1000)))]);
        assert_eq!(ledger.entries().len(), 1);
        assert_eq!(ledger.total().value(), dec!(1000));
    }

    #[test]
    fn standard_labels_start_at_zero() {
        let ledger = FixedCostLedger::with_standard_labels();
        assert_eq!(ledger.entries().len(), STANDARD_LABELS.len());
        assert!(ledger.total().is_zero());
        assert_eq!(ledger.entries()[0].label, "rent");
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut ledger = shop_ledger();
        ledger.set("refund", Money::new(dec!(-1)));
        assert!(matches!(
            ledger.validate(),
            Err(PricingError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let ledger = FixedCostLedger::from_entries([
            ("rent", Money::new(Decimal::MAX)),
            ("staff", Money::new(dec!(1))),
        ]);
        assert_eq!(ledger.total().value(), Decimal::MAX);
        assert!(matches!(
            ledger.validate(),
            Err(PricingError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn empty_ledger_totals_zero() {
        let ledger = FixedCostLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.total().is_zero());
        assert!(ledger.validate().is_ok());
    }
}
