use tracing::debug;

use crate::common::types::{Market, RiskLimits};

/// Spread assumed for every market until real order book spreads are wired in
pub const PLACEHOLDER_SPREAD: f64 = 0.01;

/// Source of a market's bid-ask spread
///
/// Discovery payloads carry no spread, so the filter asks this provider.
/// Any `Fn(&Market) -> f64` works, which lets callers plug in CLOB data.
pub trait SpreadProvider: Send + Sync {
    fn spread(&self, market: &Market) -> f64;
}

impl<F> SpreadProvider for F
where
    F: Fn(&Market) -> f64 + Send + Sync,
{
    fn spread(&self, market: &Market) -> f64 {
        self(market)
    }
}

/// Reports the same spread for every market
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderSpread(pub f64);

impl Default for PlaceholderSpread {
    fn default() -> Self {
        Self(PLACEHOLDER_SPREAD)
    }
}

impl SpreadProvider for PlaceholderSpread {
    fn spread(&self, _market: &Market) -> f64 {
        self.0
    }
}

/// Static risk filter: liquidity floor and spread ceiling
///
/// Pure and order preserving. A market with missing or unparseable
/// liquidity counts as zero liquidity.
#[derive(Debug, Clone, Default)]
pub struct MarketFilter<S = PlaceholderSpread> {
    spread: S,
}

impl MarketFilter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: SpreadProvider> MarketFilter<S> {
    pub fn with_spread_provider(spread: S) -> Self {
        Self { spread }
    }

    /// Check a single market against the limits
    pub fn passes(&self, market: &Market, limits: &RiskLimits) -> bool {
        let liquidity = market.effective_liquidity();
        if liquidity < limits.min_liquidity_usd {
            debug!(
                market_id = %market.id,
                liquidity,
                floor = limits.min_liquidity_usd,
                "Rejected market: liquidity below floor"
            );
            return false;
        }

        let spread = self.spread.spread(market);
        if spread > limits.max_spread_pct {
            debug!(
                market_id = %market.id,
                spread,
                ceiling = limits.max_spread_pct,
                "Rejected market: spread above ceiling"
            );
            return false;
        }

        true
    }

    /// Keep the markets that pass, in their original order
    pub fn apply(&self, markets: Vec<Market>, limits: &RiskLimits) -> Vec<Market> {
        markets
            .into_iter()
            .filter(|m| self.passes(m, limits))
            .collect()
    }
}

/// Filter with the placeholder spread
pub fn filter_markets(markets: Vec<Market>, limits: &RiskLimits) -> Vec<Market> {
    MarketFilter::new().apply(markets, limits)
}
