//! REST client for the Polymarket Gamma API (market discovery)

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::messages::{GammaEvent, GammaEventsResponse};
use crate::common::errors::{PolyfundError, Result};
use crate::common::traits::{MarketQuery, MarketSource};
use crate::common::types::Market;
use crate::config::types::PolymarketConfig;

/// REST client for the Gamma API
#[derive(Debug, Clone)]
pub struct GammaClient {
    /// HTTP client
    client: Client,
    /// Base URL for the Gamma API
    gamma_url: String,
    /// Events requested by a keyword search
    search_limit: u32,
    /// Events requested by the firehose query
    firehose_limit: u32,
}

impl GammaClient {
    /// Create a new client with default limits and a 30s timeout
    pub fn new(gamma_url: &str) -> Result<Self> {
        let config = PolymarketConfig {
            gamma_url: gamma_url.to_string(),
            ..PolymarketConfig::default()
        };
        Self::from_config(&config, Duration::from_secs(30))
    }

    /// Create a client from configuration
    pub fn from_config(config: &PolymarketConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PolyfundError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            gamma_url: config.gamma_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit,
            firehose_limit: config.firehose_limit,
        })
    }

    /// Search events by keyword, then supplement with the top events by volume
    ///
    /// Only markets whose question or event title contains one of the
    /// keywords are kept. A failing keyword search is an error; a failing
    /// firehose query only loses the supplement.
    #[instrument(skip(self))]
    pub async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<Market>> {
        let mut params = vec![
            ("limit", self.search_limit.to_string()),
            ("q", query.keywords.join(" ")),
            ("closed", "false".to_string()),
        ];
        if let Some(tag) = &query.tag {
            params.push(("tag", tag.clone()));
        }

        let events = self.get_events(&params).await?;
        let mut markets = relevant_markets(events, &query.keywords);
        debug!("Keyword search returned {} relevant markets", markets.len());

        let mut firehose_params = vec![
            ("limit", self.firehose_limit.to_string()),
            ("closed", "false".to_string()),
            ("order", "volume24hr".to_string()),
        ];
        if let Some(tag) = &query.tag {
            firehose_params.push(("tag", tag.clone()));
        }

        match self.get_events(&firehose_params).await {
            Ok(events) => {
                let mut seen: HashSet<String> = markets.iter().map(|m| m.id.clone()).collect();
                let before = markets.len();
                for market in relevant_markets(events, &query.keywords) {
                    if seen.insert(market.id.clone()) {
                        markets.push(market);
                    }
                }
                debug!("Firehose added {} markets", markets.len() - before);
            }
            Err(e) => warn!("Firehose query failed, keeping keyword results: {}", e),
        }

        info!("Discovered {} markets", markets.len());
        Ok(markets)
    }

    /// Fetch all markets of one event by slug
    #[instrument(skip(self))]
    pub async fn fetch_event_by_slug(&self, slug: &str) -> Result<Vec<Market>> {
        let events = self.get_events(&[("slug", slug.to_string())]).await?;
        Ok(events.into_iter().flat_map(GammaEvent::into_markets).collect())
    }

    /// Fetch a single market by ID
    #[instrument(skip(self))]
    pub async fn fetch_market_by_id(&self, market_id: &str) -> Result<Market> {
        let url = format!("{}/markets/{}", self.gamma_url, market_id);
        debug!("Fetching market from Gamma API: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(PolyfundError::EventNotFound(market_id.to_string()));
            }
            let body = response.text().await.unwrap_or_default();
            return Err(PolyfundError::InvalidResponse(format!(
                "Gamma API returned status {}: {}",
                status, body
            )));
        }

        let market: Market = response.json().await?;
        Ok(market)
    }

    async fn get_events(&self, params: &[(&str, String)]) -> Result<Vec<GammaEvent>> {
        let url = Url::parse_with_params(&format!("{}/events", self.gamma_url), params)?;
        debug!("Fetching events from Gamma API: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PolyfundError::InvalidResponse(format!(
                "Gamma API returned status {}: {}",
                status, body
            )));
        }

        let events: GammaEventsResponse = response.json().await?;
        Ok(events.into_events())
    }
}

#[async_trait]
impl MarketSource for GammaClient {
    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<Market>> {
        GammaClient::fetch_markets(self, query).await
    }

    async fn fetch_event_by_slug(&self, slug: &str) -> Result<Vec<Market>> {
        GammaClient::fetch_event_by_slug(self, slug).await
    }

    fn source_name(&self) -> &'static str {
        "polymarket-gamma"
    }
}

/// Flatten events into markets and keep those mentioning any keyword
fn relevant_markets(events: Vec<GammaEvent>, keywords: &[String]) -> Vec<Market> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    events
        .into_iter()
        .flat_map(GammaEvent::into_markets)
        .filter(|m| {
            let corpus = format!(
                "{} {}",
                m.question,
                m.event_title.as_deref().unwrap_or_default()
            )
            .to_lowercase();
            keywords.iter().any(|k| corpus.contains(k.as_str()))
        })
        .collect()
}
