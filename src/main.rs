//! Shop pricing command line.
//!
//! Prices a product sheet against a fixed-cost ledger and a profit policy,
//! prints the analysis and optionally writes the product, summary and
//! fixed-cost tables as CSV.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shelf_pricing::export::{self, format_money, format_percent};
use shelf_pricing::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

#[derive(Parser)]
#[command(name = "shelf-pricing", version, about = "Suggested retail prices for small shops")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a product sheet
    Price {
        /// Product sheet (delimited text with headers)
        products: PathBuf,
        /// JSON pricing config; overrides --preset
        #[arg(long)]
        config: Option<PathBuf>,
        /// Built-in configuration to start from
        #[arg(long, value_enum, default_value_t = PresetArg::MonthlyMargin)]
        preset: PresetArg,
        /// Flat margin on price (fraction, e.g. 0.25)
        #[arg(long, conflicts_with = "markup")]
        margin: Option<Decimal>,
        /// Flat markup on cost (fraction, e.g. 0.30)
        #[arg(long)]
        markup: Option<Decimal>,
        /// Expected units sold per month
        #[arg(long, conflicts_with = "daily")]
        volume: Option<u64>,
        /// Spread one day of fixed costs over the batch instead
        #[arg(long)]
        daily: bool,
        /// Field delimiter of the product sheet
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        /// Write results.csv, summary.csv and fixed_costs.csv here
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Currency symbol for summaries
        #[arg(long, default_value = "R$")]
        currency: String,
        /// How many products to list in each ranking
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Write a sample product sheet
    Template {
        #[arg(default_value = "template_products.csv")]
        out: PathBuf,
    },
    /// Run the built-in walkthrough
    Demo,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    MonthlyMargin,
    DailyMargin,
    CategoryMarkup,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::MonthlyMargin => Preset::MonthlyMargin,
            PresetArg::DailyMargin => Preset::DailyMargin,
            PresetArg::CategoryMarkup => Preset::CategoryMarkup,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("shelf-pricing started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    match cli.command {
        Commands::Price {
            products,
            config,
            preset,
            margin,
            markup,
            volume,
            daily,
            delimiter,
            out_dir,
            currency,
            top,
        } => {
            let mut pricing = match config {
                Some(path) => PricingConfig::from_path(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => Preset::from(preset).config(),
            };
            if let Some(rate) = margin {
                pricing.policy = ProfitPolicy::margin(rate);
            }
            if let Some(rate) = markup {
                pricing.policy = ProfitPolicy::markup(rate);
            }
            if let Some(units) = volume {
                pricing.basis = AllocationBasis::monthly(units);
            }
            if daily {
                pricing.basis = AllocationBasis::daily();
            }
            let delimiter = u8::try_from(delimiter).context("delimiter must be a single byte")?;
            run_price(&products, pricing, delimiter, out_dir.as_deref(), &currency, top)
        }
        Commands::Template { out } => {
            let file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
            export::write_template(file)?;
            info!("template written to {}", out.display());
            println!("Template created: {}", out.display());
            println!("Required columns: name, unit_cost. Optional: quantity (default 1), category");
            Ok(())
        }
        Commands::Demo => run_demo(),
    }
}

fn run_price(
    products: &Path,
    config: PricingConfig,
    delimiter: u8,
    out_dir: Option<&Path>,
    currency: &str,
    top: usize,
) -> Result<()> {
    let engine = Engine::new(config).context("invalid pricing configuration")?;

    let loaded = ProductLoader::new()
        .with_delimiter(delimiter)
        .load_path(products)?;
    if !loaded.skipped.is_empty() {
        warn!(
            "{} rows skipped while loading {}",
            loaded.skipped.len(),
            products.display()
        );
    }
    info!(
        products = loaded.batch.len(),
        units = loaded.batch.total_units(),
        "product sheet loaded"
    );

    let (results, report) = engine.analyze(&loaded.batch)?;

    print_results(&results, currency);
    print_summary(&report, currency);
    print_rankings(&results, top, currency);

    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        export::write_results(File::create(dir.join("results.csv"))?, &results)?;
        export::write_summary(
            File::create(dir.join("summary.csv"))?,
            &report,
            currency,
            chrono::Utc::now(),
        )?;
        export::write_fixed_costs(
            File::create(dir.join("fixed_costs.csv"))?,
            &engine.config().ledger,
            &engine.config().policy,
            currency,
        )?;
        info!("tables written to {}", dir.display());
    }

    Ok(())
}

fn print_results(results: &[PricingResult], currency: &str) {
    println!("Products\n");
    for r in results {
        println!("  {} [{}]", r.name, r.category);
        println!(
            "    cost {} | qty {} | fixed/unit {} | price {} | rate {} | margin {} | profit {}",
            format_money(r.unit_cost, currency),
            r.quantity,
            format_money(r.allocated_fixed_cost_per_unit, currency),
            format_money(r.sale_price_per_unit, currency),
            format_percent(r.applied_rate_percent),
            format_percent(r.realized_margin_percent),
            format_money(r.total_profit, currency),
        );
    }
    println!();
}

fn print_summary(report: &BatchReport, currency: &str) {
    println!("Summary\n");
    for (metric, value) in export::summary_rows(report, currency) {
        println!("  {:<24} {}", metric, value);
    }
    println!();
}

fn print_rankings(results: &[PricingResult], top: usize, currency: &str) {
    for (title, key) in [
        ("Top products by total profit", RankKey::TotalProfit),
        ("Top products by markup", RankKey::Markup),
        ("Top products by quantity", RankKey::Quantity),
    ] {
        println!("{}\n", title);
        for (i, r) in rank_by(results, key, top).into_iter().enumerate() {
            println!(
                "  {}. {} | qty {} | markup {} | profit {}",
                i + 1,
                r.name,
                r.quantity,
                format_percent(r.markup_percent),
                format_money(r.total_profit, currency),
            );
        }
        println!();
    }
}

fn demo_batch() -> ProductBatch {
    [
        ("Arroz 5kg", dec!(15.50), 10, "Grãos"),
        ("Feijão 1kg", dec!(8.90), 15, "Grãos"),
        ("Óleo de Soja", dec!(12.30), 8, "Óleos"),
        ("Macarrão 500g", dec!(4.20), 20, "Massas"),
        ("Café 500g", dec!(18.75), 12, "Bebidas"),
        ("Açúcar 1kg", dec!(6.80), 25, "Básicos"),
        ("Farinha de Trigo 1kg", dec!(5.90), 18, "Básicos"),
        ("Leite 1L", dec!(4.50), 30, "Laticínios"),
        ("Pão de Forma", dec!(8.90), 15, "Pães"),
        ("Queijo Mussarela 500g", dec!(25.80), 8, "Laticínios"),
    ]
    .into_iter()
    .map(|(name, cost, quantity, category)| {
        ProductRecord::new(name, Money::new(cost))
            .with_quantity(quantity)
            .with_category(category)
    })
    .collect()
}

fn run_demo() -> Result<()> {
    println!("Shop Pricing Walkthrough\n");

    scenario_1_single_product()?;
    scenario_2_monthly_volume_batch()?;
    scenario_3_daily_window()?;
    scenario_4_category_markup()?;

    println!("Walkthrough complete.");
    Ok(())
}

/// One product priced with a 25% margin.
fn scenario_1_single_product() -> Result<()> {
    println!("Scenario 1: Single Product\n");

    let engine = Engine::new(PricingConfig::monthly_margin())?;
    let record = ProductRecord::new("Arroz 5kg", Money::new(dec!(15.50))).with_quantity(10);
    let r = engine.price_one(&record)?;

    println!(
        "  Fixed costs: {} per month, 1000 units",
        format_money(engine.config().total_fixed_cost(), "R$")
    );
    println!("  Purchase cost: {}", format_money(r.unit_cost, "R$"));
    println!(
        "  Fixed cost share: {}",
        format_money(r.allocated_fixed_cost_per_unit, "R$")
    );
    println!("  Suggested price: {}", format_money(r.sale_price_per_unit, "R$"));
    println!("  Markup over purchase cost: {}", format_percent(r.markup_percent));
    println!("  Profit on 10 units: {}\n", format_money(r.total_profit, "R$"));
    Ok(())
}

/// Ten products, fixed costs spread over 2500 units a month.
fn scenario_2_monthly_volume_batch() -> Result<()> {
    println!("Scenario 2: Monthly Volume Batch\n");

    let mut config = PricingConfig::monthly_margin();
    config.basis = AllocationBasis::monthly(2500);
    let engine = Engine::new(config)?;
    let (results, report) = engine.analyze(&demo_batch())?;

    println!("  {} products, {} units", report.product_count, report.total_units);
    println!("  Revenue: {}", format_money(report.total_revenue, "R$"));
    println!("  Profit: {}", format_money(report.total_profit, "R$"));
    println!("  Average markup: {}", format_percent(report.average_markup_percent));
    for r in rank_by(&results, RankKey::TotalProfit, 3) {
        println!("    {} earns {}", r.name, format_money(r.total_profit, "R$"));
    }
    println!();
    Ok(())
}

/// Same batch, one day of fixed costs spread over the units purchased.
fn scenario_3_daily_window() -> Result<()> {
    println!("Scenario 3: Daily Window\n");

    let engine = Engine::new(PricingConfig::daily_margin())?;
    let batch = demo_batch();
    let share = engine.fixed_cost_per_unit(batch.total_units());
    let (_, report) = engine.analyze(&batch)?;

    println!(
        "  One day of fixed costs over {} units: {} each",
        batch.total_units(),
        format_money(share, "R$")
    );
    println!("  Profit: {}", format_money(report.total_profit, "R$"));
    println!("  Highest markup: {}\n", report.highest_markup.name);
    Ok(())
}

/// Per-category markups with a 30% fallback.
fn scenario_4_category_markup() -> Result<()> {
    println!("Scenario 4: Category Markup\n");

    let engine = Engine::new(PricingConfig::category_markup())?;
    let results = engine.price_batch(&demo_batch())?;

    for r in &results {
        println!(
            "  {:<22} {:<11} markup {:>6} price {}",
            r.name,
            r.category.as_str(),
            format_percent(r.applied_rate_percent),
            format_money(r.sale_price_per_unit, "R$"),
        );
    }
    println!();
    Ok(())
}
