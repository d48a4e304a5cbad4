// shelf-pricing: suggested retail prices for small-shop inventories.
// fixed costs are allocated per unit, then a margin or markup policy sets the price.
// the engine is pure computation with no I/O; loader and export are thin adapters.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Money, Rate, Category
//   2.x  ledger.rs: monthly fixed-cost ledger
//   3.x  allocation.rs: monthly-volume or daily-window cost allocation
//   4.x  policy.rs: margin, markup and per-category markup policies
//   5.x  product.rs: product records and batches
//   6.x  config.rs: session config, validation, presets, JSON loading
//   7.x  engine/: per-item and batch pricing, results, errors
//   8.x  report.rs: batch aggregation and rankings
//   9.x  loader.rs: product sheet loader (delimited text)
//   10.x export.rs: product, summary and fixed-cost tables

// core pricing modules
pub mod allocation;
pub mod engine;
pub mod ledger;
pub mod policy;
pub mod product;
pub mod report;
pub mod types;

// configuration
pub mod config;

// adapters
pub mod export;
pub mod loader;

// re exports for convenience
pub use allocation::*;
pub use config::{configure, ConfigError, Preset, PricingConfig};
pub use engine::*;
pub use ledger::*;
pub use policy::*;
pub use product::*;
pub use report::*;
pub use types::*;
pub use export::ExportError;
pub use loader::{load_products, LoadError, LoadedBatch, ProductLoader, SkippedRow};
