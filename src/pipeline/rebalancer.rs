use futures_util::future::join_all;
use tracing::{info, instrument, warn};

use super::research::Research;
use crate::allocation::{AllocationEngine, AllocationPlan, MarketFilter, PlaceholderSpread, SpreadProvider};
use crate::common::traits::{MarketQuery, MarketSource};
use crate::common::types::{Market, RiskLimits};
use crate::config::types::PortfolioConfig;

/// Result of one rebalance run
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceOutcome {
    pub plan: AllocationPlan,
    /// Markets returned by discovery, before filtering
    pub discovered: usize,
    /// Markets that passed the risk filter
    pub passed_filter: usize,
}

/// Discovery → risk filter → allocation, for one research result
///
/// Discovery failures never abort a run: they are logged and treated as an
/// empty market list, which the engine reports through the plan warnings.
pub struct Rebalancer<S, P = PlaceholderSpread> {
    source: S,
    filter: MarketFilter<P>,
    engine: AllocationEngine,
    limits: RiskLimits,
    /// Keywords searched when the research result has none
    fallback_keywords: Vec<String>,
}

impl<S: MarketSource> Rebalancer<S> {
    pub fn new(source: S, limits: RiskLimits) -> Self {
        Self {
            source,
            filter: MarketFilter::new(),
            engine: AllocationEngine::default(),
            limits,
            fallback_keywords: Vec::new(),
        }
    }

    /// Rebalancer bound to a portfolio's risk limits and keywords
    pub fn for_portfolio(source: S, portfolio: &PortfolioConfig) -> Self {
        Self::new(source, portfolio.risk).with_fallback_keywords(portfolio.keywords.clone())
    }
}

impl<S: MarketSource, P: SpreadProvider> Rebalancer<S, P> {
    pub fn with_engine(mut self, engine: AllocationEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_fallback_keywords(mut self, keywords: Vec<String>) -> Self {
        self.fallback_keywords = keywords;
        self
    }

    pub fn with_filter<Q: SpreadProvider>(self, filter: MarketFilter<Q>) -> Rebalancer<S, Q> {
        Rebalancer {
            source: self.source,
            filter,
            engine: self.engine,
            limits: self.limits,
            fallback_keywords: self.fallback_keywords,
        }
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Run the full pipeline
    #[instrument(skip(self, research), fields(source = self.source.source_name()))]
    pub async fn run(&self, research: &Research, bankroll: f64, tag: Option<&str>) -> RebalanceOutcome {
        let markets = self.discover(research, tag).await;
        self.allocate_markets(markets, research, bankroll)
    }

    /// Filter and allocate an already discovered market list
    pub fn allocate_markets(&self, markets: Vec<Market>, research: &Research, bankroll: f64) -> RebalanceOutcome {
        let discovered = markets.len();
        let passing = self.filter.apply(markets, &self.limits);
        info!(
            "{} of {} markets passed liquidity/spread checks",
            passing.len(),
            discovered
        );

        let plan = self
            .engine
            .allocate(&passing, bankroll, &self.limits, &research.judgments);
        info!("Allocation finished: {} trades generated", plan.trades.len());

        RebalanceOutcome {
            plan,
            discovered,
            passed_filter: passing.len(),
        }
    }

    /// Keyword discovery with the event-slug fallback
    pub async fn discover(&self, research: &Research, tag: Option<&str>) -> Vec<Market> {
        let mut markets = Vec::new();

        let keywords = if research.keywords.is_empty() {
            &self.fallback_keywords
        } else {
            &research.keywords
        };

        if keywords.is_empty() {
            warn!("No research or portfolio keywords, skipping keyword discovery");
        } else {
            if research.keywords.is_empty() {
                info!("Research produced no keywords, using {} portfolio keywords", keywords.len());
            }
            let mut query = MarketQuery::new(keywords.clone());
            if let Some(tag) = tag {
                query = query.with_tag(tag);
            }

            match self.source.fetch_markets(&query).await {
                Ok(found) => markets = found,
                Err(e) => warn!("Market discovery failed: {}", e),
            }
            info!("Found {} raw markets", markets.len());
        }

        if markets.is_empty() && !research.event_slugs.is_empty() {
            info!(
                "Falling back to {} event slugs from research",
                research.event_slugs.len()
            );
            markets = self.fetch_slugs(&research.event_slugs).await;
            info!("Total markets after slug fallback: {}", markets.len());
        }

        markets
    }

    /// Fetch events concurrently, keeping slug order
    async fn fetch_slugs(&self, slugs: &[String]) -> Vec<Market> {
        let results = join_all(slugs.iter().map(|slug| self.source.fetch_event_by_slug(slug))).await;

        slugs
            .iter()
            .zip(results)
            .flat_map(|(slug, result)| match result {
                Ok(markets) => markets,
                Err(e) => {
                    warn!("Failed to fetch event {}: {}", slug, e);
                    Vec::new()
                }
            })
            .collect()
    }
}
