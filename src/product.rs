// 5.0: product records and batches as handed to the engine.
// loaders are responsible for defaults and coercion; the engine only checks
// the two things it cannot price around: a name and a non-negative cost.

use crate::engine::PricingError;
use crate::types::{Category, Money};
use serde::{Deserialize, Serialize};

fn default_quantity() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub unit_cost: Money,
    #[serde(default = "default_quantity")]
    pub quantity: u64,
    #[serde(default)]
    pub category: Category,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, unit_cost: Money) -> Self {
        Self {
            name: name.into(),
            unit_cost,
            quantity: 1,
            category: Category::default(),
        }
    }

    pub fn with_quantity(mut self, quantity: u64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }
}

/// Ordered records priced together. Order is kept for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductBatch {
    records: Vec<ProductRecord>,
}

impl ProductBatch {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: ProductRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Units across the batch, saturating at `u64::MAX`. For display.
    pub fn total_units(&self) -> u64 {
        self.records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.quantity))
    }

    /// Units across the batch, blaming the record that overflows the count.
    pub fn checked_total_units(&self) -> Result<u64, PricingError> {
        let mut total = 0u64;
        for record in &self.records {
            total = total
                .checked_add(record.quantity)
                .ok_or_else(|| PricingError::InvalidRecord {
                    name: record.name.clone(),
                    reason: format!("quantity {} overflows the batch unit count", record.quantity),
                })?;
        }
        Ok(total)
    }
}

impl FromIterator<ProductRecord> for ProductBatch {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ProductBatch {
    type Item = &'a ProductRecord;
    type IntoIter = std::slice::Iter<'a, ProductRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_defaults() {
        let record = ProductRecord::new("Arroz 5kg", Money::new(dec!(15.50)));
        assert_eq!(record.quantity, 1);
        assert!(record.category.is_default());
    }

    #[test]
    fn batch_total_units() {
        let batch: ProductBatch = vec![
            ProductRecord::new("Arroz 5kg", Money::new(dec!(15.50))).with_quantity(10),
            ProductRecord::new("Feijão 1kg", Money::new(dec!(8.90))).with_quantity(15),
            ProductRecord::new("Leite 1L", Money::new(dec!(4.50))),
        ]
        .into_iter()
        .collect();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.total_units(), 26);
        assert_eq!(batch.checked_total_units(), Ok(26));
    }

    #[test]
    fn unit_count_overflow_names_the_record() {
        let batch: ProductBatch = vec![
            ProductRecord::new("A", Money::new(dec!(1))).with_quantity(10_000_000_000_000_000_000),
            ProductRecord::new("B", Money::new(dec!(1))).with_quantity(10_000_000_000_000_000_000),
        ]
        .into_iter()
        .collect();

        assert_eq!(batch.total_units(), u64::MAX);
        match batch.checked_total_units() {
            Err(PricingError::InvalidRecord { name, .. }) => assert_eq!(name, "B"),
            other => panic!("expected overflow on B, got {:?}", other),
        }
    }

    #[test]
    fn empty_batch_has_no_units() {
        let batch = ProductBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.total_units(), 0);
    }

    #[test]
    fn record_json_defaults() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"name":"Café 500g","unit_cost":"18.75"}"#).unwrap();
        assert_eq!(record.quantity, 1);
        assert!(record.category.is_default());
    }
}
