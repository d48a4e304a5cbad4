// 7.0 engine/core.rs: engine handle. owns one validated, immutable pricing config.

use super::pricing::{price_batch, price_one};
use super::results::{PricingError, PricingResult};
use crate::allocation::AllocationBasis;
use crate::config::{configure, PricingConfig};
use crate::ledger::FixedCostLedger;
use crate::policy::ProfitPolicy;
use crate::product::{ProductBatch, ProductRecord};
use crate::report::{build_report, BatchReport};
use crate::types::Money;

/** 7.1: engine handle. cheap to clone, safe to share across threads */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    config: PricingConfig,
}

impl Engine {
    pub fn new(config: PricingConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn configure(
        ledger: FixedCostLedger,
        basis: AllocationBasis,
        policy: ProfitPolicy,
    ) -> Result<Self, PricingError> {
        Ok(Self {
            config: configure(ledger, basis, policy)?,
        })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    // validated as a whole; the old config stays if the new one is rejected
    pub fn reconfigure(&mut self, config: PricingConfig) -> Result<(), PricingError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Fixed cost per unit for a batch of `batch_total_units`.
    pub fn fixed_cost_per_unit(&self, batch_total_units: u64) -> Money {
        self.config
            .basis
            .per_unit_share(self.config.ledger.total(), batch_total_units)
    }

    /// Price a single record as if it were the whole batch.
    pub fn price_one(&self, record: &ProductRecord) -> Result<PricingResult, PricingError> {
        price_one(record, &self.config, record.quantity)
    }

    pub fn price_batch(&self, batch: &ProductBatch) -> Result<Vec<PricingResult>, PricingError> {
        price_batch(batch, &self.config)
    }

    /// Price a batch and summarise it in one call.
    pub fn analyze(
        &self,
        batch: &ProductBatch,
    ) -> Result<(Vec<PricingResult>, BatchReport), PricingError> {
        let results = self.price_batch(batch)?;
        let report = build_report(&results)?;
        Ok((results, report))
    }
}
