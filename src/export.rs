//! Tabular export of priced batches.
//!
//! Three tables, one per concern: the per-product analysis, the financial
//! summary, and the fixed-cost breakdown. Values are written as delimited
//! text; money is rounded to cents and percentages to two places. No styling.

use crate::engine::PricingResult;
use crate::ledger::FixedCostLedger;
use crate::policy::ProfitPolicy;
use crate::report::BatchReport;
use crate::types::Money;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;
use tracing::debug;

pub const RESULT_HEADERS: [&str; 16] = [
    "name",
    "category",
    "quantity",
    "unit_cost",
    "allocated_fixed_cost_per_unit",
    "total_unit_cost",
    "sale_price_per_unit",
    "applied_rate_percent",
    "markup_percent",
    "unit_profit",
    "total_purchase_cost",
    "total_fixed_cost",
    "total_cost_overall",
    "total_sale_price",
    "total_profit",
    "realized_margin_percent",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn cents(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// `R$ 1,234.50` style. Two decimals, comma thousands separator.
pub fn format_money(amount: Money, symbol: &str) -> String {
    let rounded = amount
        .value()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if symbol.is_empty() {
        format!("{}{}.{}", sign, grouped, frac_part)
    } else {
        format!("{}{} {}.{}", sign, symbol, grouped, frac_part)
    }
}

/// `25.0%` style. Input is already a percentage.
pub fn format_percent(value: Decimal) -> String {
    format!(
        "{:.1}%",
        value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub fn describe_policy(policy: &ProfitPolicy) -> String {
    match policy {
        ProfitPolicy::MarginOnPrice { rate } => {
            format!("margin on price {}", format_percent(rate.as_percent()))
        }
        ProfitPolicy::MarkupOnCost { rate } => {
            format!("markup on cost {}", format_percent(rate.as_percent()))
        }
        ProfitPolicy::CategoryMarkup { rates, default } => format!(
            "markup by category ({} categories, default {})",
            rates.len(),
            format_percent(default.as_percent())
        ),
    }
}

pub fn write_results<W: Write>(writer: W, results: &[PricingResult]) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(RESULT_HEADERS)?;
    for r in results {
        out.write_record([
            r.name.clone(),
            r.category.to_string(),
            r.quantity.to_string(),
            cents(r.unit_cost.value()),
            cents(r.allocated_fixed_cost_per_unit.value()),
            cents(r.total_unit_cost.value()),
            cents(r.sale_price_per_unit.value()),
            cents(r.applied_rate_percent),
            cents(r.markup_percent),
            cents(r.unit_profit.value()),
            cents(r.total_purchase_cost.value()),
            cents(r.total_fixed_cost.value()),
            cents(r.total_cost_overall.value()),
            cents(r.total_sale_price.value()),
            cents(r.total_profit.value()),
            cents(r.realized_margin_percent),
        ])?;
    }
    out.flush()?;
    debug!(rows = results.len(), "wrote product analysis");
    Ok(())
}

/// Summary rows as (metric, value) pairs, ready for any table renderer.
pub fn summary_rows(report: &BatchReport, symbol: &str) -> Vec<(String, String)> {
    let money = |m: Money| format_money(m, symbol);
    vec![
        ("Products".into(), report.product_count.to_string()),
        ("Units purchased".into(), report.total_units.to_string()),
        ("Purchase cost".into(), money(report.total_purchase_cost)),
        ("Fixed cost allocated".into(), money(report.total_fixed_cost)),
        ("Total cost".into(), money(report.total_cost_overall)),
        ("Estimated revenue".into(), money(report.total_revenue)),
        ("Estimated profit".into(), money(report.total_profit)),
        ("Average markup".into(), format_percent(report.average_markup_percent)),
        ("Average margin".into(), format_percent(report.average_margin_percent)),
        ("Highest unit cost".into(), report.highest_unit_cost.name.clone()),
        ("Lowest unit cost".into(), report.lowest_unit_cost.name.clone()),
        ("Largest quantity".into(), report.largest_quantity.name.clone()),
        ("Highest total profit".into(), report.highest_total_profit.name.clone()),
        ("Highest markup".into(), report.highest_markup.name.clone()),
        ("Lowest markup".into(), report.lowest_markup.name.clone()),
    ]
}

pub fn write_summary<W: Write>(
    writer: W,
    report: &BatchReport,
    symbol: &str,
    generated_at: DateTime<Utc>,
) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["metric", "value"])?;
    out.write_record(["Generated at", generated_at.to_rfc3339().as_str()])?;
    for (metric, value) in summary_rows(report, symbol) {
        out.write_record([metric, value])?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_fixed_costs<W: Write>(
    writer: W,
    ledger: &FixedCostLedger,
    policy: &ProfitPolicy,
    symbol: &str,
) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["cost", "monthly_amount"])?;
    for entry in ledger.entries() {
        out.write_record([entry.label.clone(), format_money(entry.monthly_amount, symbol)])?;
    }
    out.write_record(["TOTAL".to_string(), format_money(ledger.total(), symbol)])?;
    out.write_record(["Profit policy".to_string(), describe_policy(policy)])?;
    out.flush()?;
    Ok(())
}

// sample sheet a shop owner can fill in
const TEMPLATE_ROWS: [(&str, &str, u32, &str); 26] = [
    ("Arroz 5kg", "15.50", 20, "Grãos"),
    ("Feijão 1kg", "8.90", 25, "Grãos"),
    ("Óleo de Soja 900ml", "12.30", 15, "Óleos"),
    ("Macarrão 500g", "3.45", 30, "Massas"),
    ("Café 500g", "18.75", 10, "Bebidas"),
    ("Açúcar 1kg", "4.20", 40, "Temperos"),
    ("Farinha de Trigo 1kg", "3.80", 35, "Farinhas"),
    ("Leite 1L", "4.50", 50, "Laticínios"),
    ("Pão de Forma", "6.80", 25, "Pães"),
    ("Manteiga 500g", "8.90", 12, "Laticínios"),
    ("Queijo 500g", "22.50", 8, "Laticínios"),
    ("Presunto 200g", "12.80", 15, "Frios"),
    ("Banana 1kg", "5.90", 30, "Frutas"),
    ("Maçã 1kg", "8.40", 20, "Frutas"),
    ("Tomate 1kg", "6.20", 25, "Verduras"),
    ("Cebola 1kg", "4.80", 40, "Verduras"),
    ("Batata 1kg", "3.90", 35, "Verduras"),
    ("Cenoura 1kg", "2.80", 30, "Verduras"),
    ("Alho 100g", "3.50", 20, "Temperos"),
    ("Cebolinha 1 maço", "1.20", 50, "Verduras"),
    ("Salgadinho Cheetos 85g", "2.50", 40, "Salgadinhos"),
    ("Salgadinho Ruffles 100g", "3.20", 35, "Salgadinhos"),
    ("Salgadinho Doritos 100g", "3.80", 30, "Salgadinhos"),
    ("Biscoito Recheado 130g", "2.90", 45, "Biscoitos"),
    ("Biscoito Cream Cracker 200g", "4.50", 25, "Biscoitos"),
    ("Chocolate 90g", "5.80", 20, "Chocolates"),
];

/// Product sheet with the expected headers and sample rows.
pub fn write_template<W: Write>(writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["name", "unit_cost", "quantity", "category"])?;
    for (name, cost, quantity, category) in TEMPLATE_ROWS {
        out.write_record([name, cost, quantity.to_string().as_str(), category])?;
    }
    out.flush()?;
    Ok(())
}
