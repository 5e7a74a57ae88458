// In app/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use core_types::AssetType;
use engine::{MockQuoteFeed, SimulationRequest, SimulationRunner};
use rust_decimal::Decimal;
use strategies::StrategyConfiguration;
use strategies::catalog;
use tracing_subscriber::prelude::*;

mod params;
use crate::params::{ParamsReport, parse_edit};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Edit strategy parameters and run mock trading simulations.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Applies parameter edits and prints the parameters with their errors.
    Params {
        /// A `field=value` edit. May be repeated; edits apply in order.
        #[arg(long = "set", value_parser = parse_edit)]
        edits: Vec<(String, String)>,

        /// A TOML file of `field = value` edits, applied before `--set`.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Discards the configured overrides and starts from the defaults.
        #[arg(long)]
        reset: bool,
    },

    /// Lists the available strategies.
    Strategies,

    /// Runs a mock simulation against the seeded quote feed.
    Simulate {
        /// Asset to trade (e.g., "reliance", "btc").
        #[arg(short, long)]
        symbol: Option<String>,

        /// Market of the asset: stocks, crypto or forex.
        #[arg(long)]
        asset_type: Option<AssetType>,

        /// Strategy slug or display name.
        #[arg(long)]
        strategy: Option<String>,

        /// Simulation period (e.g., "24h", "1w").
        #[arg(short, long)]
        period: Option<String>,

        /// Starting capital.
        #[arg(short, long)]
        amount: Option<Decimal>,

        /// Grows each order by the profit realized so far.
        #[arg(long)]
        reinvest: bool,

        /// Number of quotes to trade on.
        #[arg(short, long, default_value_t = 20)]
        ticks: u32,

        /// Seed for the mock quote feed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// A `field=value` parameter edit. May be repeated.
        #[arg(long = "set", value_parser = parse_edit)]
        edits: Vec<(String, String)>,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("Failed to load settings from config/")?;

    let default_level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(default_level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!(environment = %settings.app.environment, "Settings loaded.");

    match cli.command {
        Commands::Params { edits, file, reset } => handle_params(&settings, edits, file, reset),
        Commands::Strategies => handle_strategies(),
        Commands::Simulate {
            symbol,
            asset_type,
            strategy,
            period,
            amount,
            reinvest,
            ticks,
            seed,
            edits,
        } => {
            let mut config = settings.simulation.simulation_config();
            if let Some(symbol) = symbol {
                config.asset_name = symbol;
            }
            if let Some(asset_type) = asset_type {
                config.asset_type = asset_type;
            }
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            if let Some(period) = period {
                config.time_period = period;
            }
            if let Some(amount) = amount {
                config.trade_amount = amount;
            }
            config.reinvest_profits |= reinvest;

            let strategy_config = configured_params(&settings, false, &edits)?;
            let request = SimulationRequest::build(config, &strategy_config)
                .context("Cannot start the simulation")?;
            handle_simulate(&settings, request, ticks, seed)
        }
    }
}

/// Builds the parameter set from configured overrides and command-line edits.
fn configured_params(
    settings: &app_config::Settings,
    reset: bool,
    edits: &[(String, String)],
) -> Result<StrategyConfiguration> {
    let mut config = StrategyConfiguration::new();
    params::apply_all(&mut config, &settings.strategy.param_edits()?);
    if reset {
        config.reset();
    }
    for (field, value) in edits {
        params::apply_raw(&mut config, field, value)?;
    }
    Ok(config)
}

// --- "Params" Subcommand Logic ---

fn handle_params(
    settings: &app_config::Settings,
    edits: Vec<(String, String)>,
    file: Option<PathBuf>,
    reset: bool,
) -> Result<()> {
    let mut config = configured_params(settings, reset, &[])?;

    if let Some(path) = file {
        let file_edits = app_config::load_param_edits(&path)
            .with_context(|| format!("Failed to read parameter edits from {}", path.display()))?;
        tracing::info!(count = file_edits.len(), path = %path.display(), "Applying parameter edits from file.");
        params::apply_all(&mut config, &file_edits);
    }
    for (field, value) in &edits {
        params::apply_raw(&mut config, field, value)?;
    }

    println!("{}", serde_json::to_string_pretty(&ParamsReport::from(&config))?);
    Ok(())
}

// --- "Strategies" Subcommand Logic ---

fn handle_strategies() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(catalog::catalog())?);
    Ok(())
}

// --- "Simulate" Subcommand Logic ---

/// Runs `ticks` trades spread evenly over the simulation period, then stops
/// the simulation and prints it with its trades and performance report.
fn handle_simulate(settings: &app_config::Settings, request: SimulationRequest, ticks: u32, seed: u64) -> Result<()> {
    let user_id = settings.simulation.user_id;
    let mut runner = SimulationRunner::new(MockQuoteFeed::new(seed), settings.simulation.runner_settings());

    // --- 1. Start ---
    let started_at = Utc::now();
    let simulation_id = runner.start(user_id, &request, started_at)?.id;
    let step = request.duration / i32::try_from(ticks.saturating_add(1)).context("Too many ticks")?;

    // --- 2. Trade ---
    let mut now = started_at;
    for _ in 0..ticks {
        now += step;
        if runner.tick(user_id, now)?.is_none() && runner.store().active_for(user_id).is_none() {
            break;
        }
    }

    // --- 3. Stop and Report ---
    let summary = match runner.store().active_for(user_id) {
        Some(_) => runner.stop(user_id, now)?,
        None => runner
            .store()
            .report(simulation_id)
            .cloned()
            .context("Finished simulation has no report")?,
    };
    tracing::info!(
        simulation_id,
        trades = summary.total_trades,
        profit_loss = %summary.profit_loss,
        "Simulation finished."
    );

    let results = runner.store().results(user_id, simulation_id)?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
