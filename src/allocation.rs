// 3.0: fixed-cost allocation. turns a monthly ledger total into a per-unit share.
// either spread over an assumed monthly sales volume, or spread one day's worth
// of fixed cost over the units actually present in the batch being priced.

use crate::engine::PricingError;
use crate::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAYS_PER_MONTH: u32 = 30;
pub const DEFAULT_MONTHLY_VOLUME: u64 = 1000;

fn default_days() -> u32 {
    DEFAULT_DAYS_PER_MONTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationBasis {
    /// total fixed cost / expected units sold per month
    MonthlySalesVolume { units: u64 },
    /// (total fixed cost / days) / units in the current batch
    DailyWindow {
        #[serde(default = "default_days")]
        days: u32,
    },
}

impl Default for AllocationBasis {
    fn default() -> Self {
        AllocationBasis::MonthlySalesVolume {
            units: DEFAULT_MONTHLY_VOLUME,
        }
    }
}

impl AllocationBasis {
    pub fn monthly(units: u64) -> Self {
        AllocationBasis::MonthlySalesVolume { units }
    }

    pub fn daily() -> Self {
        AllocationBasis::DailyWindow {
            days: DEFAULT_DAYS_PER_MONTH,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        match self {
            AllocationBasis::MonthlySalesVolume { units: 0 } => {
                Err(PricingError::InvalidConfiguration {
                    reason: "monthly sales volume must be greater than zero".to_string(),
                })
            }
            AllocationBasis::DailyWindow { days: 0 } => Err(PricingError::InvalidConfiguration {
                reason: "daily window needs at least one day per month".to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Whether the share depends on the batch's unit count.
    pub fn uses_batch_units(&self) -> bool {
        matches!(self, AllocationBasis::DailyWindow { .. })
    }

    /// Fixed cost carried by each unit. `batch_total_units` is only read by the
    /// daily window; an empty batch there allocates nothing.
    pub fn per_unit_share(&self, total_fixed_cost: Money, batch_total_units: u64) -> Money {
        match *self {
            AllocationBasis::MonthlySalesVolume { units } => {
                total_fixed_cost.div(Decimal::from(units))
            }
            AllocationBasis::DailyWindow { days } => {
                if batch_total_units == 0 {
                    return Money::zero();
                }
                total_fixed_cost
                    .div(Decimal::from(days))
                    .div(Decimal::from(batch_total_units))
            }
        }
    }
}
