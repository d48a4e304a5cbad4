//! Profit policies and sale-price formulas.
//!
//! Margin is profit as a fraction of the sale price, so a 25% margin on a
//! unit costing 80 sells at 80 / 0.75. Markup is profit as a fraction added
//! on top of cost, so a 30% markup on 10 sells at 13. The two scales are
//! not interchangeable: a 25% margin is a 33.3% markup.
//!
//! Exactly one policy is active per pricing session.

use crate::engine::PricingError;
use crate::types::{Category, Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfitPolicy {
    /// Profit as a fraction of the final price. rate in [0, 1).
    MarginOnPrice { rate: Rate },
    /// Profit added on top of total unit cost. rate >= 0.
    MarkupOnCost { rate: Rate },
    /// Markup chosen by product category, falling back to `default`.
    CategoryMarkup { rates: CategoryRates, default: Rate },
}

impl Default for ProfitPolicy {
    fn default() -> Self {
        ProfitPolicy::MarginOnPrice {
            rate: Rate::new(dec!(0.25)),
        }
    }
}

/// Per-category markup table. Keys are uppercased on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRates(BTreeMap<Category, Rate>);

impl CategoryRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<Category>, rate: Rate) {
        self.0.insert(category.into(), rate);
    }

    pub fn get(&self, category: &Category) -> Option<Rate> {
        self.0.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &Rate)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Typical neighbourhood-grocery markups.
    pub fn retail_defaults() -> Self {
        let mut rates = Self::new();
        for (category, percent) in [
            ("GRÃOS", dec!(20)),
            ("ÓLEOS", dec!(20)),
            ("MASSAS", dec!(30)),
            ("FARINHAS", dec!(25)),
            ("BÁSICOS", dec!(25)),
            ("BEBIDAS", dec!(35)),
            ("LATICÍNIOS", dec!(30)),
            ("FRIOS", dec!(40)),
            ("PÃES", dec!(40)),
            ("FRUTAS", dec!(50)),
            ("VERDURAS", dec!(50)),
            ("TEMPEROS", dec!(60)),
            ("SALGADINHOS", dec!(50)),
            ("BISCOITOS", dec!(45)),
            ("CHOCOLATES", dec!(50)),
        ] {
            rates.insert(category, Rate::from_percent(percent));
        }
        rates
    }
}

impl<C: Into<Category>> FromIterator<(C, Rate)> for CategoryRates {
    fn from_iter<I: IntoIterator<Item = (C, Rate)>>(iter: I) -> Self {
        let mut rates = Self::new();
        for (category, rate) in iter {
            rates.insert(category, rate);
        }
        rates
    }
}

impl ProfitPolicy {
    pub fn margin(rate: Decimal) -> Self {
        ProfitPolicy::MarginOnPrice {
            rate: Rate::new(rate),
        }
    }

    pub fn markup(rate: Decimal) -> Self {
        ProfitPolicy::MarkupOnCost {
            rate: Rate::new(rate),
        }
    }

    pub fn by_category(rates: CategoryRates, default: Decimal) -> Self {
        ProfitPolicy::CategoryMarkup {
            rates,
            default: Rate::new(default),
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        match self {
            ProfitPolicy::MarginOnPrice { rate } => {
                if rate.value() < Decimal::ZERO || rate.value() >= Decimal::ONE {
                    return Err(PricingError::InvalidConfiguration {
                        reason: format!("margin must be in [0, 1), got {}", rate.value()),
                    });
                }
            }
            ProfitPolicy::MarkupOnCost { rate } => check_markup("markup", *rate)?,
            ProfitPolicy::CategoryMarkup { rates, default } => {
                check_markup("default markup", *default)?;
                for (category, rate) in rates.iter() {
                    check_markup(&format!("markup for {}", category), *rate)?;
                }
            }
        }
        Ok(())
    }

    pub fn is_margin(&self) -> bool {
        matches!(self, ProfitPolicy::MarginOnPrice { .. })
    }

    /// Rate in effect for an item of `category`.
    pub fn rate_for(&self, category: &Category) -> Rate {
        match self {
            ProfitPolicy::MarginOnPrice { rate } | ProfitPolicy::MarkupOnCost { rate } => *rate,
            ProfitPolicy::CategoryMarkup { rates, default } => {
                rates.get(category).unwrap_or(*default)
            }
        }
    }

    /// Sale price for one unit whose full cost (purchase + fixed share) is known.
    /// `None` when the price does not fit in a `Decimal`.
    pub fn sale_price(&self, total_unit_cost: Money, category: &Category) -> Option<Money> {
        let rate = self.rate_for(category).value();
        match self {
            ProfitPolicy::MarginOnPrice { .. } => total_unit_cost.checked_div(Decimal::ONE - rate),
            ProfitPolicy::MarkupOnCost { .. } | ProfitPolicy::CategoryMarkup { .. } => {
                total_unit_cost.checked_mul(Decimal::ONE + rate)
            }
        }
    }
}

fn check_markup(what: &str, rate: Rate) -> Result<(), PricingError> {
    if rate.value() < Decimal::ZERO {
        return Err(PricingError::InvalidConfiguration {
            reason: format!("{} must not be negative, got {}", what, rate.value()),
        });
    }
    Ok(())
}
