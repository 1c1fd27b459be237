//! Trait definitions for external collaborators

use async_trait::async_trait;

use super::errors::Result;
use super::types::Market;

/// Keyword query sent to a market discovery service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketQuery {
    /// Keywords to search for; a market is relevant if any of them matches
    pub keywords: Vec<String>,
    /// Optional platform tag to restrict the search to
    pub tag: Option<String>,
}

impl MarketQuery {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Trait for market discovery services (Polymarket Gamma, fixtures, etc.)
///
/// Implementations are expected to be non-deterministic and rate limited.
/// Returned markets carry `event_title` and `event_slug` from their parent
/// event so the engine can group and link them.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Find markets relevant to the query keywords
    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<Market>>;

    /// Fetch every market of the event identified by `slug`
    async fn fetch_event_by_slug(&self, slug: &str) -> Result<Vec<Market>>;

    /// Name of the backing service, for logging
    fn source_name(&self) -> &'static str;
}
