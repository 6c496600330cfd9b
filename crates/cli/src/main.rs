//! Reimbursement command line interface
//!
//! Prints the total reimbursement for one trip. Diagnostics go to stderr so
//! stdout carries only the amount.

use anyhow::{Context, Result};
use clap::Parser;
use reimburse_core::{calculate_reimbursement, ReimburseConfig, TripInput};
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "reimburse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute a legacy travel reimbursement", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Trip duration in days
    days: u32,

    /// Miles traveled
    #[arg(value_parser = parse_amount)]
    miles: Decimal,

    /// Total receipt amount
    #[arg(value_parser = parse_amount)]
    receipts: Decimal,
}

/// Plain decimal, or scientific notation such as `1.5e2`
fn parse_amount(value: &str) -> std::result::Result<Decimal, String> {
    value
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| format!("`{value}` is not a decimal amount: {e}"))
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ReimburseConfig::from_env().context("Failed to load configuration")?;
    init_logging(&config.logging.level)?;
    debug!(model = %config.model.path.display(), "Configuration resolved");

    let input = TripInput::new(args.days, args.miles, args.receipts)?;
    let loader = config.model_loader();
    let total = calculate_reimbursement(&input, &loader).with_context(|| {
        format!(
            "Failed to compute reimbursement with model {}",
            loader.path().display()
        )
    })?;

    println!("{:.2}", total);
    Ok(())
}
