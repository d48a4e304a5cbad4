// 6.0 config.rs: one pricing session's settings. fixed costs, allocation basis, profit policy.
// 6.1 presets reproduce the three shop setups the engine replaces: monthly margin,
//     daily margin, and per-category markup.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::allocation::AllocationBasis;
use crate::engine::PricingError;
use crate::ledger::FixedCostLedger;
use crate::policy::{CategoryRates, ProfitPolicy};
use crate::types::Money;

/// Immutable pricing configuration. Build it with [`configure`] or a preset
/// and pass it into every computation; reconfiguring means building a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub ledger: FixedCostLedger,
    #[serde(default)]
    pub basis: AllocationBasis,
    #[serde(default)]
    pub policy: ProfitPolicy,
}

/// Validate and bundle a session configuration. Nothing is applied on failure.
pub fn configure(
    ledger: FixedCostLedger,
    basis: AllocationBasis,
    policy: ProfitPolicy,
) -> Result<PricingConfig, PricingError> {
    let config = PricingConfig {
        ledger,
        basis,
        policy,
    };
    config.validate()?;
    Ok(config)
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ledger: FixedCostLedger::with_standard_labels(),
            basis: AllocationBasis::default(),
            policy: ProfitPolicy::default(),
        }
    }
}

impl PricingConfig {
    // 25% margin, fixed costs spread over 1000 units a month
    pub fn monthly_margin() -> Self {
        Self {
            ledger: sample_ledger(),
            basis: AllocationBasis::monthly(1000),
            policy: ProfitPolicy::margin(dec!(0.25)),
        }
    }

    // 25% margin, one day of fixed costs spread over the batch
    pub fn daily_margin() -> Self {
        Self {
            ledger: sample_ledger(),
            basis: AllocationBasis::daily(),
            policy: ProfitPolicy::margin(dec!(0.25)),
        }
    }

    // retail markups per category, 30% for anything unlisted
    pub fn category_markup() -> Self {
        Self {
            ledger: sample_ledger(),
            basis: AllocationBasis::monthly(5000),
            policy: ProfitPolicy::by_category(CategoryRates::retail_defaults(), dec!(0.30)),
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        self.ledger.validate()?;
        self.basis.validate()?;
        self.policy.validate()?;
        Ok(())
    }

    pub fn total_fixed_cost(&self) -> Money {
        self.ledger.total()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PricingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

fn sample_ledger() -> FixedCostLedger {
    FixedCostLedger::from_entries([
        ("rent", Money::new(dec!(2500))),
        ("electricity", Money::new(dec!(800))),
        ("water", Money::new(dec!(300))),
        ("energy", Money::new(dec!(1200))),
        ("staff", Money::new(dec!(4000))),
        ("other", Money::new(dec!(500))),
    ])
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] PricingError),
}

// Named configurations selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    MonthlyMargin,
    DailyMargin,
    CategoryMarkup,
}

impl Preset {
    pub fn config(&self) -> PricingConfig {
        match self {
            Preset::MonthlyMargin => PricingConfig::monthly_margin(),
            Preset::DailyMargin => PricingConfig::daily_margin(),
            Preset::CategoryMarkup => PricingConfig::category_markup(),
        }
    }
}
