//! Polyfund - Main Entry Point
//!
//! Runs one rebalance: reads a research result, discovers markets (Gamma API
//! or an offline market file), filters and allocates, then prints the plan.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use polyfund::allocation::{AllocationEngine, MarketFilter, PlaceholderSpread};
use polyfund::config::{load_config, AppConfig, PortfolioConfig};
use polyfund::pipeline::{RebalanceOutcome, Rebalancer, Research, StaticMarkets};
use polyfund::report::format_recommendation;
use polyfund::{GammaClient, MarketSource, RiskLimits};

const DEFAULT_PORTFOLIO_NAME: &str = "Thematic Portfolio";

/// Output format for the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "polyfund.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Research result (JSON) with keywords, summary and judgments
    #[arg(short, long)]
    research: String,

    /// Offline market list (JSON array); Gamma discovery is used when absent
    #[arg(short, long)]
    markets: Option<String>,

    /// Capital available for this run
    #[arg(short, long, env = "POLYFUND_BANKROLL")]
    bankroll: f64,

    /// Portfolio id from the configuration (risk limits, tag, fallback keywords)
    #[arg(short, long)]
    portfolio: Option<String>,

    /// Restrict discovery to a Polymarket tag; overrides the portfolio's tag
    #[arg(long)]
    tag: Option<String>,

    /// Portfolio name shown in the report; overrides the portfolio's name
    #[arg(long)]
    name: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config)).context("loading configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    init_logging(&level, args.log_json);

    info!("Starting polyfund rebalance");
    info!("Configuration file: {}", args.config);

    anyhow::ensure!(args.bankroll > 0.0, "bankroll must be positive");

    let research = Research::from_file(&args.research)
        .with_context(|| format!("reading research from {}", args.research))?;

    let portfolio = match &args.portfolio {
        Some(id) => {
            let found = config.portfolio(id).cloned().with_context(|| {
                let known: Vec<&str> = config.portfolios.iter().map(|p| p.id.as_str()).collect();
                format!("unknown portfolio '{}' (configured: {})", id, known.join(", "))
            })?;
            info!("Using portfolio {} ({})", found.id, found.name);
            Some(found)
        }
        None => None,
    };
    let run = RunSettings::resolve(&args, &config, portfolio.as_ref());

    let outcome = match &args.markets {
        Some(path) => {
            let source = StaticMarkets::from_file(path)
                .with_context(|| format!("reading markets from {}", path))?;
            info!("Loaded {} markets from {}", source.len(), path);
            rebalance(source, &config, &research, &run, args.bankroll).await
        }
        None => {
            let timeout = Duration::from_secs(config.settings.request_timeout_seconds);
            let source = GammaClient::from_config(&config.polymarket, timeout)?;
            rebalance(source, &config, &research, &run, args.bankroll).await
        }
    };

    info!(
        "Discovered {} markets, {} passed filters, {} targets",
        outcome.discovered,
        outcome.passed_filter,
        outcome.plan.targets.len()
    );

    match args.format {
        OutputFormat::Markdown => {
            println!("{}", format_recommendation(&outcome.plan, &research, &run.name))
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.plan)?),
    }

    Ok(())
}

/// Per-run values after applying the portfolio and the CLI overrides
struct RunSettings {
    limits: RiskLimits,
    tag: Option<String>,
    name: String,
    fallback_keywords: Vec<String>,
}

impl RunSettings {
    fn resolve(args: &Args, config: &AppConfig, portfolio: Option<&PortfolioConfig>) -> Self {
        match portfolio {
            Some(p) => Self {
                limits: p.risk,
                tag: args.tag.clone().or_else(|| p.tag.clone()),
                name: args.name.clone().unwrap_or_else(|| p.name.clone()),
                fallback_keywords: p.keywords.clone(),
            },
            None => Self {
                limits: config.risk,
                tag: args.tag.clone(),
                name: args
                    .name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PORTFOLIO_NAME.to_string()),
                fallback_keywords: Vec::new(),
            },
        }
    }
}

async fn rebalance<S: MarketSource>(
    source: S,
    config: &AppConfig,
    research: &Research,
    run: &RunSettings,
    bankroll: f64,
) -> RebalanceOutcome {
    let rebalancer = Rebalancer::new(source, run.limits)
        .with_fallback_keywords(run.fallback_keywords.clone())
        .with_engine(AllocationEngine::new(config.allocation.engine_settings()))
        .with_filter(MarketFilter::with_spread_provider(PlaceholderSpread(
            config.allocation.placeholder_spread,
        )));

    rebalancer.run(research, bankroll, run.tag.as_deref()).await
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout carries only the plan
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
