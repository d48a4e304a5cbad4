//! Delimited-text product loader.
//!
//! Reads a product sheet into a [`ProductBatch`]. Expected columns, matched
//! case-insensitively (English or the original Portuguese headers):
//!   name | Nome_Produto      required
//!   unit_cost | Custo_Compra required
//!   quantity | Quantidade    optional, defaults to 1
//!   category | Categoria     optional, defaults to DEFAULT
//!
//! Rows whose cost is missing or not a number are skipped, as are rows with
//! an empty name or a negative quantity. Skipped rows are reported back and
//! logged at warn level.

use crate::product::{ProductBatch, ProductRecord};
use crate::types::{Category, Money};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

const NAME_COLUMNS: [&str; 2] = ["name", "nome_produto"];
const COST_COLUMNS: [&str; 2] = ["unit_cost", "custo_compra"];
const QUANTITY_COLUMNS: [&str; 2] = ["quantity", "quantidade"];
const CATEGORY_COLUMNS: [&str; 2] = ["category", "categoria"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the source, header is line 1
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedBatch {
    pub batch: ProductBatch,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Copy)]
pub struct ProductLoader {
    delimiter: u8,
}

impl Default for ProductLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

struct Columns {
    name: usize,
    cost: usize,
    quantity: Option<usize>,
    category: Option<usize>,
}

impl ProductLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn load<R: Read>(&self, reader: R) -> Result<LoadedBatch, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = resolve_columns(csv_reader.headers()?)?;
        if columns.quantity.is_none() {
            warn!("no quantity column, every product counts as 1 unit");
        }

        let mut loaded = LoadedBatch::default();
        for (offset, result) in csv_reader.records().enumerate() {
            let row = result?;
            let line = offset as u64 + 2;
            match parse_row(&row, &columns) {
                Ok(record) => loaded.batch.push(record),
                Err(reason) => {
                    warn!(line, %reason, "skipping product row");
                    loaded.skipped.push(SkippedRow { line, reason });
                }
            }
        }

        debug!(
            products = loaded.batch.len(),
            skipped = loaded.skipped.len(),
            "product sheet loaded"
        );
        Ok(loaded)
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedBatch, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
            path: path.display().to_string(),
            source,
        })?;
        self.load(file)
    }
}

/// Load with the default comma delimiter.
pub fn load_products<R: Read>(reader: R) -> Result<LoadedBatch, LoadError> {
    ProductLoader::default().load(reader)
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, LoadError> {
    let find = |aliases: &[&str]| {
        headers
            .iter()
            .position(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a)))
    };
    Ok(Columns {
        name: find(&NAME_COLUMNS[..]).ok_or(LoadError::MissingColumn("name"))?,
        cost: find(&COST_COLUMNS[..]).ok_or(LoadError::MissingColumn("unit_cost"))?,
        quantity: find(&QUANTITY_COLUMNS[..]),
        category: find(&CATEGORY_COLUMNS[..]),
    })
}

fn parse_row(row: &csv::StringRecord, columns: &Columns) -> Result<ProductRecord, String> {
    let name = row.get(columns.name).unwrap_or_default();
    if name.is_empty() {
        return Err("empty product name".to_string());
    }

    let raw_cost = row.get(columns.cost).unwrap_or_default();
    let unit_cost = parse_number(raw_cost)
        .ok_or_else(|| format!("unit cost {:?} is not a number", raw_cost))?;

    let quantity = match columns.quantity.and_then(|i| row.get(i)).and_then(parse_number) {
        None => 1,
        Some(q) if q < Decimal::ZERO => return Err(format!("quantity {} is negative", q)),
        Some(q) => q
            .trunc()
            .to_u64()
            .ok_or_else(|| format!("quantity {} is out of range", q))?,
    };

    let category = columns
        .category
        .and_then(|i| row.get(i))
        .map(Category::new)
        .unwrap_or_default();

    Ok(ProductRecord {
        name: name.to_string(),
        unit_cost: Money::new(unit_cost),
        quantity,
        category,
    })
}

fn parse_number(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
