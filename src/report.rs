//! Batch-level aggregation.
//!
//! A report is a single fold over priced results: counts, sums, averages and
//! the extremal products. Ties on any extremum go to the product that comes
//! first in batch order.

use crate::engine::{PricingError, PricingResult};
use crate::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reference to a product inside the priced batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub product_count: usize,
    pub total_units: u64,
    pub total_purchase_cost: Money,
    pub total_fixed_cost: Money,
    pub total_cost_overall: Money,
    pub total_revenue: Money,
    pub total_profit: Money,
    pub average_markup_percent: Decimal,
    pub average_margin_percent: Decimal,
    pub highest_unit_cost: ItemRef,
    pub lowest_unit_cost: ItemRef,
    pub largest_quantity: ItemRef,
    pub highest_markup: ItemRef,
    pub lowest_markup: ItemRef,
    pub highest_total_profit: ItemRef,
}

pub fn build_report(results: &[PricingResult]) -> Result<BatchReport, PricingError> {
    if results.is_empty() {
        return Err(PricingError::EmptyBatch);
    }

    let count = Decimal::from(results.len());
    // saturating: a near-zero purchase cost carries a saturated markup
    let markup_sum = results
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.markup_percent));
    let margin_sum = results
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.realized_margin_percent));

    let mut total_units = 0u64;
    for r in results {
        total_units = total_units
            .checked_add(r.quantity)
            .ok_or_else(|| out_of_range(r, "total units"))?;
    }

    Ok(BatchReport {
        product_count: results.len(),
        total_units,
        total_purchase_cost: checked_total(results, "purchase cost", |r| r.total_purchase_cost)?,
        total_fixed_cost: checked_total(results, "fixed cost", |r| r.total_fixed_cost)?,
        total_cost_overall: checked_total(results, "total cost", |r| r.total_cost_overall)?,
        total_revenue: checked_total(results, "revenue", |r| r.total_sale_price)?,
        total_profit: checked_total(results, "profit", |r| r.total_profit)?,
        average_markup_percent: markup_sum / count,
        average_margin_percent: margin_sum / count,
        highest_unit_cost: arg_max(results, |r| r.unit_cost.value()),
        lowest_unit_cost: arg_min(results, |r| r.unit_cost.value()),
        largest_quantity: arg_max(results, |r| Decimal::from(r.quantity)),
        highest_markup: arg_max(results, |r| r.markup_percent),
        lowest_markup: arg_min(results, |r| r.markup_percent),
        highest_total_profit: arg_max(results, |r| r.total_profit.value()),
    })
}

fn out_of_range(result: &PricingResult, what: &str) -> PricingError {
    PricingError::InvalidRecord {
        name: result.name.clone(),
        reason: format!("batch {} is out of range", what),
    }
}

// sum of one money column, blaming the item that overflows it
fn checked_total<F>(results: &[PricingResult], what: &str, field: F) -> Result<Money, PricingError>
where
    F: Fn(&PricingResult) -> Money,
{
    let mut total = Money::zero();
    for r in results {
        total = total
            .checked_add(field(r))
            .ok_or_else(|| out_of_range(r, what))?;
    }
    Ok(total)
}

// callers guarantee results is non-empty
fn arg_max<F>(results: &[PricingResult], key: F) -> ItemRef
where
    F: Fn(&PricingResult) -> Decimal,
{
    arg_best(results, key, |candidate, best| candidate > best)
}

fn arg_min<F>(results: &[PricingResult], key: F) -> ItemRef
where
    F: Fn(&PricingResult) -> Decimal,
{
    arg_best(results, key, |candidate, best| candidate < best)
}

fn arg_best<F, B>(results: &[PricingResult], key: F, beats: B) -> ItemRef
where
    F: Fn(&PricingResult) -> Decimal,
    B: Fn(Decimal, Decimal) -> bool,
{
    let mut best_index = 0;
    let mut best_value = key(&results[0]);
    for (index, result) in results.iter().enumerate().skip(1) {
        let value = key(result);
        // strict comparison: the earlier item keeps a tie
        if beats(value, best_value) {
            best_index = index;
            best_value = value;
        }
    }
    ItemRef {
        index: best_index,
        name: results[best_index].name.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    TotalProfit,
    Markup,
    Quantity,
}

impl RankKey {
    fn value(&self, result: &PricingResult) -> Decimal {
        match self {
            RankKey::TotalProfit => result.total_profit.value(),
            RankKey::Markup => result.markup_percent,
            RankKey::Quantity => Decimal::from(result.quantity),
        }
    }
}

/// Top `n` results by `key`, highest first, batch order among equals.
pub fn rank_by(results: &[PricingResult], key: RankKey, n: usize) -> Vec<&PricingResult> {
    let mut ranked: Vec<&PricingResult> = results.iter().collect();
    ranked.sort_by(|a, b| key.value(b).cmp(&key.value(a)));
    ranked.truncate(n);
    ranked
}
