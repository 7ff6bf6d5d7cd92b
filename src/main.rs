use analytics::{BreakEvenSolver, MetricsEngine, StockRange};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::{init_logging, load_config, LogFormat};
use rust_decimal::Decimal;
use std::path::PathBuf;

mod render;

/// The main entry point for the Pricewise calculator.
fn main() -> Result<()> {
    // A missing .env file is fine; it only carries optional overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    // Held until exit so the rolling file writer gets flushed.
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    let engine = MetricsEngine::new(config.costs).context("Invalid cost schedule")?;

    match cli.command {
        Commands::Metrics(args) => {
            let mut input = config.metrics_input();
            if let Some(stock) = args.stock {
                input.available_stock = stock;
            }
            tracing::info!(stock = input.available_stock, "Computing metrics");

            let report = engine.compute(&input).context("Failed to compute metrics")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::metrics_table(&report));
                println!("{}", render::cost_schedule_table(engine.costs()));
            }
        }
        Commands::BreakEven(args) => {
            let solver = BreakEvenSolver::new(engine, config.break_even)
                .context("Invalid break-even settings")?;
            tracing::info!(target_profit = %args.target_profit, "Searching for break-even stock");

            let outcome = solver
                .solve_for_profit(&config.offer, args.target_profit)
                .context("Break-even search failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", render::break_even_table(&outcome, args.target_profit, solver.settings()));
            }
        }
        Commands::Sweep(args) => {
            let range = StockRange {
                start: args.from,
                end: args.to,
                step: args.step,
            };
            tracing::info!(from = range.start, to = range.end, step = range.step, "Sweeping stock levels");

            let reports = engine.sweep(&config.offer, &range).context("Stock sweep failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                println!("{}", render::sweep_table(&reports));
            }
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Profitability and break-even calculator for cash-on-delivery offers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML scenario file.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Overrides the log format from the configuration file.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the order funnel, costs and profitability for the scenario.
    Metrics(MetricsArgs),
    /// Search for the stock level at which the offer breaks even.
    BreakEven(BreakEvenArgs),
    /// Compute metrics for a range of stock levels.
    Sweep(SweepArgs),
}

#[derive(Parser)]
struct MetricsArgs {
    /// Overrides `scenario.available_stock`.
    #[arg(long)]
    stock: Option<u32>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct BreakEvenArgs {
    /// Search for this profit instead of zero.
    #[arg(long, default_value_t = Decimal::ZERO, allow_negative_numbers = true)]
    target_profit: Decimal,

    /// Print the outcome as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SweepArgs {
    /// First stock level.
    #[arg(long)]
    from: u32,

    /// Last stock level (inclusive).
    #[arg(long)]
    to: u32,

    /// Distance between stock levels.
    #[arg(long, default_value_t = 100)]
    step: u32,

    /// Print the reports as JSON.
    #[arg(long)]
    json: bool,
}
