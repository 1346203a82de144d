mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use market_risk_core::AnalysisConfig;

use commands::analysis::{AnalyzeArgs, RiskReportArgs};
use commands::derivatives::OptionPriceArgs;
use commands::fixed_income::BondArgs;
use commands::interest_rate_models::{RateModelArgs, YieldCurveArgs};
use commands::portfolio::{PositionSizeArgs, RiskScoreArgs, VarArgs};
use commands::volatility_surface::VolSurfaceArgs;

/// Short-rate, option, bond, volatility and portfolio risk analytics
#[derive(Parser)]
#[command(
    name = "mrisk",
    version,
    about = "Short-rate, option, bond, volatility and portfolio risk analytics",
    long_about = "A CLI for market risk analytics with decimal precision. Supports \
                  Vasicek rate forecasts, yield curve classification, Black-Scholes \
                  pricing, bond duration/convexity, volatility smiles, MOVE/VIX risk \
                  scoring, position sizing, parametric VaR and composite reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON file overriding analysis defaults
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Vasicek short-rate forecast, zero-coupon prices and scenarios
    RateModel(RateModelArgs),
    /// Black-Scholes price, Greeks and moneyness of a European option
    OptionPrice(OptionPriceArgs),
    /// Classify the yield curve and derive forward rates
    YieldCurve(YieldCurveArgs),
    /// Bond price, duration, convexity and rate-shock table
    Bond(BondArgs),
    /// Volatility smile, skew metrics and term structure
    VolSurface(VolSurfaceArgs),
    /// Composite MOVE/VIX risk score
    RiskScore(RiskScoreArgs),
    /// Risk-scaled position size and stop-loss
    PositionSize(PositionSizeArgs),
    /// Parametric VaR/CVaR from VIX-implied volatility
    Var(VarArgs),
    /// Comprehensive analysis of one market snapshot
    Analyze(AnalyzeArgs),
    /// Risk score, sizing, VaR and market analysis in one report
    RiskReport(RiskReportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&str>) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            tracing::debug!(path, "loading analysis config");
            input::file::read_json(path)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn run(cli: Cli) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;

    let value = match cli.command {
        Commands::RateModel(args) => commands::interest_rate_models::run_rate_model(args, &config),
        Commands::OptionPrice(args) => commands::derivatives::run_option_price(args, &config),
        Commands::YieldCurve(args) => commands::interest_rate_models::run_yield_curve(args, &config),
        Commands::Bond(args) => commands::fixed_income::run_bond(args, &config),
        Commands::VolSurface(args) => commands::volatility_surface::run_vol_surface(args, &config),
        Commands::RiskScore(args) => commands::portfolio::run_risk_score(args, &config),
        Commands::PositionSize(args) => commands::portfolio::run_position_size(args),
        Commands::Var(args) => commands::portfolio::run_var(args, &config),
        Commands::Analyze(args) => commands::analysis::run_analyze(args, &config),
        Commands::RiskReport(args) => commands::analysis::run_risk_report(args, &config),
        Commands::Version => {
            println!("mrisk {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
    }?;
    Ok(Some(value))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = cli.output.clone();

    match run(cli) {
        Ok(Some(value)) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
