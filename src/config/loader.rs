//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{default_risk_limits, AllocationConfig, AppConfig, AppSettings, PolymarketConfig};
use crate::allocation::SizingMode;
use crate::common::errors::{PolyfundError, Result};
use crate::common::types::RiskLimits;

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with POLYFUND_)
/// 2. Environment variables (prefixed with APP__)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // APP__RISK__MIN_LIQUIDITY_USD=5000
    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    // POLYFUND_ALLOCATION__CONVICTION_THRESHOLD=80
    builder = builder.add_source(
        Environment::with_prefix("POLYFUND")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| PolyfundError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| PolyfundError::Configuration(e.to_string()))
}

/// Load configuration from plain environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let defaults = default_risk_limits();
    let risk = RiskLimits {
        max_position_pct: env_parse("POLYFUND_MAX_POSITION_PCT")?
            .unwrap_or(defaults.max_position_pct),
        min_liquidity_usd: env_parse("POLYFUND_MIN_LIQUIDITY_USD")?
            .unwrap_or(defaults.min_liquidity_usd),
        max_spread_pct: env_parse("POLYFUND_MAX_SPREAD_PCT")?.unwrap_or(defaults.max_spread_pct),
    };

    let polymarket = PolymarketConfig {
        gamma_url: std::env::var("POLYMARKET_API_URL")
            .unwrap_or_else(|_| PolymarketConfig::default().gamma_url),
        ..PolymarketConfig::default()
    };

    let sizing_mode = match std::env::var("POLYFUND_SIZING_MODE").ok().as_deref() {
        None => SizingMode::default(),
        Some("confidence_weighted") => SizingMode::ConfidenceWeighted,
        Some("equal_weight") => SizingMode::EqualWeight,
        Some(other) => {
            return Err(PolyfundError::Configuration(format!(
                "Unknown sizing mode: {}",
                other
            )))
        }
    };

    let allocation = AllocationConfig {
        conviction_threshold: env_parse("POLYFUND_CONVICTION_THRESHOLD")?
            .unwrap_or_else(|| AllocationConfig::default().conviction_threshold),
        sizing_mode,
        enforce_position_cap: env_parse("POLYFUND_ENFORCE_POSITION_CAP")?.unwrap_or(false),
        ..AllocationConfig::default()
    };

    Ok(AppConfig {
        polymarket,
        risk,
        allocation,
        settings: AppSettings {
            log_level: std::env::var("POLYFUND_LOG_LEVEL")
                .unwrap_or_else(|_| AppSettings::default().log_level),
            ..AppSettings::default()
        },
        ..AppConfig::default()
    })
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| PolyfundError::Configuration(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("polyfund-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("polyfund.toml");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[risk]
max_position_pct = 0.25
min_liquidity_usd = 5000.0
max_spread_pct = 0.02

[allocation]
conviction_threshold = 75
sizing_mode = "equal_weight"

[[portfolios]]
id = "macro"
name = "Macro Fund"
keywords = ["fed", "inflation"]
tag = "Economy"

[portfolios.risk]
max_position_pct = 0.3
min_liquidity_usd = 2500.0
max_spread_pct = 0.04
"#
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.risk.min_liquidity_usd, 5000.0);
        assert_eq!(config.allocation.conviction_threshold, 75);
        assert_eq!(config.allocation.sizing_mode, SizingMode::EqualWeight);
        assert_eq!(config.polymarket.search_limit, 20);

        let macro_fund = config.portfolio("macro").unwrap();
        assert_eq!(macro_fund.keywords, vec!["fed", "inflation"]);
        assert_eq!(macro_fund.tag.as_deref(), Some("Economy"));
        assert_eq!(macro_fund.risk.min_liquidity_usd, 2500.0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Some("/nonexistent/polyfund.toml")).unwrap();
        assert_eq!(config.allocation.conviction_threshold, 70);
        assert!(config.portfolio("ai_policy").is_some());
    }
}
