// 7.0: pricing engine. turns a validated config and product records into
// per-item prices, costs and profits. pure functions, no I/O, no logging.

mod core;
mod pricing;
mod results;

pub use core::Engine;
pub use pricing::{price_batch, price_one};
pub use results::{PricingError, PricingResult};
