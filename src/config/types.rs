//! Configuration types

use serde::{Deserialize, Serialize};

use crate::allocation::{EngineSettings, SizingMode, CONVICTION_THRESHOLD, PLACEHOLDER_SPREAD};
use crate::common::types::RiskLimits;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Polymarket-specific configuration
    #[serde(default)]
    pub polymarket: PolymarketConfig,
    /// Risk limits applied to every run
    #[serde(default = "default_risk_limits")]
    pub risk: RiskLimits,
    /// Allocation engine tunables
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
    /// Thematic portfolios selectable with `--portfolio`
    #[serde(default = "default_portfolios")]
    pub portfolios: Vec<PortfolioConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            polymarket: PolymarketConfig::default(),
            risk: default_risk_limits(),
            allocation: AllocationConfig::default(),
            settings: AppSettings::default(),
            portfolios: default_portfolios(),
        }
    }
}

impl AppConfig {
    /// Look up a portfolio by id
    pub fn portfolio(&self, id: &str) -> Option<&PortfolioConfig> {
        self.portfolios.iter().find(|p| p.id == id)
    }
}

/// A named thematic portfolio with its own universe and risk limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Discovery keywords used when the research result has none
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Polymarket tag the discovery universe is restricted to
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_risk_limits")]
    pub risk: RiskLimits,
}

impl PortfolioConfig {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        keywords: &[&str],
        tag: &str,
        risk: RiskLimits,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            tag: Some(tag.to_string()),
            risk,
        }
    }
}

fn default_portfolios() -> Vec<PortfolioConfig> {
    vec![
        PortfolioConfig::new(
            "ai_policy",
            "AI Policy Fund",
            "Markets related to AI regulation and breakthroughs",
            &["artificial intelligence", "AGI", "OpenAI", "regulation", "compute"],
            "Technology",
            RiskLimits::new(0.20, 5000.0, 0.05),
        ),
        PortfolioConfig::new(
            "crypto_policy",
            "Crypto Regulation Fund",
            "Betting on crypto ETFs, bills, and SEC actions",
            &["Bitcoin", "ETF", "SEC", "crypto", "stablecoin"],
            "Crypto",
            RiskLimits::new(0.15, 10000.0, 0.03),
        ),
        PortfolioConfig::new(
            "sports_quant",
            "Sports Quant Details",
            "Data-driven sports betting opportunities",
            &["NBA", "NFL", "stats", "underdog"],
            "Sports",
            RiskLimits::new(0.10, 20000.0, 0.02),
        ),
    ]
}

/// Polymarket Gamma API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolymarketConfig {
    /// Gamma API URL for market discovery
    #[serde(default = "default_polymarket_gamma_url")]
    pub gamma_url: String,
    /// Number of events requested by the keyword search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Number of top events requested by the firehose query
    #[serde(default = "default_firehose_limit")]
    pub firehose_limit: u32,
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            gamma_url: default_polymarket_gamma_url(),
            search_limit: default_search_limit(),
            firehose_limit: default_firehose_limit(),
        }
    }
}

fn default_polymarket_gamma_url() -> String {
    "https://gamma-api.polymarket.com".to_string()
}

fn default_search_limit() -> u32 {
    20
}

fn default_firehose_limit() -> u32 {
    1000
}

pub(crate) fn default_risk_limits() -> RiskLimits {
    RiskLimits {
        max_position_pct: 0.10,
        min_liquidity_usd: 1000.0,
        max_spread_pct: 0.05,
    }
}

/// Allocation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Minimum confidence (0-100) for a market to receive capital
    #[serde(default = "default_conviction_threshold")]
    pub conviction_threshold: u8,
    /// How picks are sized
    #[serde(default)]
    pub sizing_mode: SizingMode,
    /// Clamp confidence-weighted positions to `risk.max_position_pct`
    #[serde(default)]
    pub enforce_position_cap: bool,
    /// Spread reported for every market until real spreads are available
    #[serde(default = "default_placeholder_spread")]
    pub placeholder_spread: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            conviction_threshold: default_conviction_threshold(),
            sizing_mode: SizingMode::default(),
            enforce_position_cap: false,
            placeholder_spread: default_placeholder_spread(),
        }
    }
}

impl AllocationConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            conviction_threshold: self.conviction_threshold.min(100),
            sizing_mode: self.sizing_mode,
            enforce_position_cap: self.enforce_position_cap,
        }
    }
}

fn default_conviction_threshold() -> u8 {
    CONVICTION_THRESHOLD
}

fn default_placeholder_spread() -> f64 {
    PLACEHOLDER_SPREAD
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
