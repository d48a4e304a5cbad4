//! Per-item and batch pricing.

use super::results::{PricingError, PricingResult};
use crate::config::PricingConfig;
use crate::product::{ProductBatch, ProductRecord};
use crate::types::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Price one record. `batch_total_units` feeds the daily-window allocation
/// and is ignored by the monthly-volume basis.
pub fn price_one(
    record: &ProductRecord,
    config: &PricingConfig,
    batch_total_units: u64,
) -> Result<PricingResult, PricingError> {
    if record.name.trim().is_empty() {
        return Err(PricingError::InvalidRecord {
            name: record.name.clone(),
            reason: "product name is empty".to_string(),
        });
    }
    if record.unit_cost.is_negative() {
        return Err(PricingError::InvalidRecord {
            name: record.name.clone(),
            reason: format!("unit cost {} is negative", record.unit_cost),
        });
    }

    let allocated = config
        .basis
        .per_unit_share(config.ledger.total(), batch_total_units);

    let overflow = |what: &str| PricingError::InvalidRecord {
        name: record.name.clone(),
        reason: format!("{} is out of range", what),
    };

    let total_unit_cost = record
        .unit_cost
        .checked_add(allocated)
        .ok_or_else(|| overflow("total unit cost"))?;

    let rate = config.policy.rate_for(&record.category);
    let sale_price = config
        .policy
        .sale_price(total_unit_cost, &record.category)
        .ok_or_else(|| overflow("sale price"))?;
    let unit_profit = sale_price.sub(total_unit_cost);

    let quantity = record.quantity;
    let times = |amount: Money, what: &str| {
        amount
            .checked_times(quantity)
            .ok_or_else(|| overflow(&format!("{} for quantity {}", what, quantity)))
    };

    Ok(PricingResult {
        name: record.name.clone(),
        category: record.category.clone(),
        quantity,
        unit_cost: record.unit_cost,
        allocated_fixed_cost_per_unit: allocated,
        total_unit_cost,
        sale_price_per_unit: sale_price,
        applied_rate_percent: rate.as_percent(),
        markup_percent: percent_of(sale_price.sub(record.unit_cost), record.unit_cost),
        unit_profit,
        total_purchase_cost: times(record.unit_cost, "purchase cost")?,
        total_fixed_cost: times(allocated, "fixed cost")?,
        total_cost_overall: times(total_unit_cost, "total cost")?,
        total_sale_price: times(sale_price, "sale price")?,
        total_profit: times(unit_profit, "profit")?,
        realized_margin_percent: percent_of(unit_profit, sale_price),
    })
}

/// Price every record in batch order. Batch units are summed once up front,
/// and only when the allocation basis reads them.
pub fn price_batch(
    batch: &ProductBatch,
    config: &PricingConfig,
) -> Result<Vec<PricingResult>, PricingError> {
    let batch_total_units = if config.basis.uses_batch_units() {
        batch.checked_total_units()?
    } else {
        0
    };
    batch
        .records()
        .iter()
        .map(|record| price_one(record, config, batch_total_units))
        .collect()
}

// part / whole * 100, zero when whole is zero. saturates when a near-zero
// whole pushes the ratio out of range.
fn percent_of(part: Money, whole: Money) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.value()
        .checked_div(whole.value())
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or_else(|| {
            if part.is_negative() == whole.is_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationBasis;
    use crate::ledger::FixedCostLedger;
    use crate::policy::{CategoryRates, ProfitPolicy};
    use crate::types::Rate;
    use rust_decimal_macros::dec;

    fn no_fixed_costs(policy: ProfitPolicy) -> PricingConfig {
        PricingConfig {
            ledger: FixedCostLedger::new(),
            basis: AllocationBasis::monthly(1000),
            policy,
        }
    }

    #[test]
    fn margin_on_price_eighty() {
        let config = no_fixed_costs(ProfitPolicy::margin(dec!(0.25)));
        let record = ProductRecord::new("Queijo", Money::new(dec!(80)));
        let result = price_one(&record, &config, 1).unwrap();

        assert_eq!(result.sale_price_per_unit.value().round_dp(6), dec!(106.666667));
        assert_eq!(result.unit_profit.value().round_dp(6), dec!(26.666667));
        assert_eq!(result.realized_margin_percent.round_dp(10), dec!(25));
        assert_eq!(result.applied_rate_percent, dec!(25));
    }

    #[test]
    fn markup_on_cost_ten() {
        let config = no_fixed_costs(ProfitPolicy::markup(dec!(0.30)));
        let record = ProductRecord::new("Biscoito", Money::new(dec!(10)));
        let result = price_one(&record, &config, 1).unwrap();

        assert_eq!(result.sale_price_per_unit.value(), dec!(13));
        assert_eq!(result.unit_profit.value(), dec!(3));
        assert_eq!(result.applied_rate_percent, dec!(30));
        assert_eq!(result.markup_percent, dec!(30));
    }

    #[test]
    fn category_markup_mixed_case() {
        let rates: CategoryRates = [("BEBIDAS", Rate::new(dec!(0.25)))].into_iter().collect();
        let config = no_fixed_costs(ProfitPolicy::by_category(rates, dec!(0.30)));

        let drink = ProductRecord::new("Suco", Money::new(dec!(4))).with_category("bebidas");
        let other = ProductRecord::new("Sabão", Money::new(dec!(4))).with_category("limpeza");

        let drink = price_one(&drink, &config, 1).unwrap();
        let other = price_one(&other, &config, 1).unwrap();

        assert_eq!(drink.applied_rate_percent, dec!(25));
        assert_eq!(drink.sale_price_per_unit.value(), dec!(5));
        assert_eq!(other.applied_rate_percent, dec!(30));
        assert_eq!(other.sale_price_per_unit.value(), dec!(5.2));
    }

    #[test]
    fn totals_scale_with_quantity() {
        let config = PricingConfig {
            ledger: FixedCostLedger::from_entries([("rent", Money::new(dec!(1000)))]),
            basis: AllocationBasis::monthly(500),
            policy: ProfitPolicy::markup(dec!(0.5)),
        };
        let record = ProductRecord::new("Arroz", Money::new(dec!(8))).with_quantity(4);
        let r = price_one(&record, &config, 4).unwrap();

        assert_eq!(r.allocated_fixed_cost_per_unit.value(), dec!(2));
        assert_eq!(r.total_unit_cost.value(), dec!(10));
        assert_eq!(r.sale_price_per_unit.value(), dec!(15));
        assert_eq!(r.total_purchase_cost.value(), dec!(32));
        assert_eq!(r.total_fixed_cost.value(), dec!(8));
        assert_eq!(r.total_cost_overall.value(), dec!(40));
        assert_eq!(r.total_sale_price.value(), dec!(60));
        assert_eq!(r.total_profit.value(), dec!(20));
        // (15 - 8) / 8
        assert_eq!(r.markup_percent, dec!(87.5));
    }

    #[test]
    fn negative_cost_rejected() {
        let config = no_fixed_costs(ProfitPolicy::markup(dec!(0.3)));
        let record = ProductRecord::new("Erro", Money::new(dec!(-1)));
        assert!(matches!(
            price_one(&record, &config, 1),
            Err(PricingError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn empty_name_rejected() {
        let config = no_fixed_costs(ProfitPolicy::markup(dec!(0.3)));
        let record = ProductRecord::new("  ", Money::new(dec!(1)));
        assert!(price_one(&record, &config, 1).is_err());
    }

    #[test]
    fn zero_cost_without_fixed_costs_prices_at_zero() {
        let config = no_fixed_costs(ProfitPolicy::margin(dec!(0.25)));
        let record = ProductRecord::new("Brinde", Money::zero());
        let r = price_one(&record, &config, 1).unwrap();
        assert!(r.sale_price_per_unit.is_zero());
        assert_eq!(r.realized_margin_percent, Decimal::ZERO);
        assert_eq!(r.markup_percent, Decimal::ZERO);
    }

    #[test]
    fn daily_window_uses_whole_batch_units() {
        let config = PricingConfig {
            ledger: FixedCostLedger::from_entries([("rent", Money::new(dec!(9300)))]),
            basis: AllocationBasis::daily(),
            policy: ProfitPolicy::markup(dec!(0)),
        };
        let batch: ProductBatch = vec![
            ProductRecord::new("A", Money::new(dec!(1))).with_quantity(20),
            ProductRecord::new("B", Money::new(dec!(2))).with_quantity(11),
        ]
        .into_iter()
        .collect();

        let results = price_batch(&batch, &config).unwrap();
        assert_eq!(results.len(), 2);
        for r in &results {
            assert_eq!(r.allocated_fixed_cost_per_unit.value(), dec!(10));
        }
        assert_eq!(results[1].total_unit_cost.value(), dec!(12));
    }

    #[test]
    fn daily_window_zero_units_allocates_nothing() {
        let config = PricingConfig {
            ledger: FixedCostLedger::from_entries([("rent", Money::new(dec!(9300)))]),
            basis: AllocationBasis::daily(),
            policy: ProfitPolicy::margin(dec!(0.2)),
        };
        let batch: ProductBatch = vec![
            ProductRecord::new("A", Money::new(dec!(4))).with_quantity(0),
            ProductRecord::new("B", Money::new(dec!(8))).with_quantity(0),
        ]
        .into_iter()
        .collect();

        let results = price_batch(&batch, &config).unwrap();
        assert!(results.iter().all(|r| r.allocated_fixed_cost_per_unit.is_zero()));
        assert_eq!(results[0].sale_price_per_unit.value(), dec!(5));
    }

    #[test]
    fn near_zero_cost_saturates_markup() {
        let config = PricingConfig::monthly_margin();
        let record = ProductRecord::new("Amostra", Money::new(Decimal::new(1, 28)));
        let r = price_one(&record, &config, 1).unwrap();

        assert_eq!(r.markup_percent, Decimal::MAX);
        assert_eq!(r.realized_margin_percent.round_dp(10), dec!(25));
    }

    #[test]
    fn quantity_overflow_is_an_invalid_record() {
        let config = no_fixed_costs(ProfitPolicy::markup(dec!(0.3)));
        let record = ProductRecord::new("Atacado", Money::new(dec!(10_000_000_000)))
            .with_quantity(u64::MAX);
        match price_one(&record, &config, 1) {
            Err(PricingError::InvalidRecord { name, .. }) => assert_eq!(name, "Atacado"),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn daily_window_unit_overflow_is_an_invalid_record() {
        let config = PricingConfig::daily_margin();
        let batch: ProductBatch = vec![
            ProductRecord::new("A", Money::new(dec!(1))).with_quantity(10_000_000_000_000_000_000),
            ProductRecord::new("B", Money::new(dec!(1))).with_quantity(10_000_000_000_000_000_000),
        ]
        .into_iter()
        .collect();

        assert!(matches!(
            price_batch(&batch, &config),
            Err(PricingError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn monthly_volume_does_not_count_batch_units() {
        let config = PricingConfig::monthly_margin();
        let batch: ProductBatch = vec![
            ProductRecord::new("A", Money::new(dec!(1))).with_quantity(10_000_000_000_000_000_000),
            ProductRecord::new("B", Money::new(dec!(1))).with_quantity(10_000_000_000_000_000_000),
        ]
        .into_iter()
        .collect();

        let results = price_batch(&batch, &config).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].allocated_fixed_cost_per_unit.value(), dec!(9.3));
    }

    #[test]
    fn batch_keeps_order() {
        let config = PricingConfig::monthly_margin();
        let batch: ProductBatch = ["Café", "Açúcar", "Leite"]
            .into_iter()
            .map(|n| ProductRecord::new(n, Money::new(dec!(5))))
            .collect();
        let names: Vec<_> = price_batch(&batch, &config)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Café", "Açúcar", "Leite"]);
    }

    #[test]
    fn batch_fails_on_first_bad_record() {
        let config = PricingConfig::monthly_margin();
        let batch: ProductBatch = vec![
            ProductRecord::new("Ok", Money::new(dec!(5))),
            ProductRecord::new("Bad", Money::new(dec!(-5))),
        ]
        .into_iter()
        .collect();
        let err = price_batch(&batch, &config).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidRecord {
                name: "Bad".to_string(),
                reason: "unit cost -5 is negative".to_string(),
            }
        );
    }
}
