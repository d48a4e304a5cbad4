// 7.0.2: result types and errors for pricing operations.

use crate::types::{Category, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing of one product. Every field derives from the session config and
/// the one record; percentages are plain numbers (25 means 25%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub name: String,
    pub category: Category,
    pub quantity: u64,
    pub unit_cost: Money,
    pub allocated_fixed_cost_per_unit: Money,
    pub total_unit_cost: Money,
    pub sale_price_per_unit: Money,
    /// markup rate for markup policies, nominal margin for the margin policy
    pub applied_rate_percent: Decimal,
    /// (sale price - purchase cost) / purchase cost
    pub markup_percent: Decimal,
    pub unit_profit: Money,
    pub total_purchase_cost: Money,
    pub total_fixed_cost: Money,
    pub total_cost_overall: Money,
    pub total_sale_price: Money,
    pub total_profit: Money,
    /// unit profit / sale price, whatever the policy
    pub realized_margin_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Invalid record {name:?}: {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("Cannot build a report from an empty batch")]
    EmptyBatch,
}
