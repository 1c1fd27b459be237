use async_trait::async_trait;
use std::path::Path;

use crate::common::errors::Result;
use crate::common::traits::{MarketQuery, MarketSource};
use crate::common::types::Market;

/// Market source backed by a fixed list, for offline runs and fixtures
///
/// Returns every market regardless of the query keywords.
#[derive(Debug, Clone, Default)]
pub struct StaticMarkets {
    markets: Vec<Market>,
}

impl StaticMarkets {
    pub fn new(markets: Vec<Market>) -> Self {
        Self { markets }
    }

    /// Load a JSON array of markets
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let markets: Vec<Market> = serde_json::from_str(&raw)?;
        Ok(Self::new(markets))
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

#[async_trait]
impl MarketSource for StaticMarkets {
    async fn fetch_markets(&self, _query: &MarketQuery) -> Result<Vec<Market>> {
        Ok(self.markets.clone())
    }

    async fn fetch_event_by_slug(&self, slug: &str) -> Result<Vec<Market>> {
        Ok(self
            .markets
            .iter()
            .filter(|m| m.event_slug.as_deref() == Some(slug))
            .cloned()
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn market(id: &str, slug: Option<&str>) -> Market {
        Market {
            id: id.to_string(),
            event_slug: slug.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_query_returns_everything() {
        let source = StaticMarkets::new(vec![market("1", Some("a")), market("2", None)]);
        let found = block_on(source.fetch_markets(&MarketQuery::new(vec!["x".to_string()]))).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(source.source_name(), "static");
    }

    #[test]
    fn test_slug_lookup() {
        let source = StaticMarkets::new(vec![
            market("1", Some("a")),
            market("2", Some("b")),
            market("3", Some("a")),
        ]);

        let ids: Vec<String> = block_on(source.fetch_event_by_slug("a"))
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(block_on(source.fetch_event_by_slug("zzz")).unwrap().is_empty());
    }

    #[test]
    fn test_from_file_rejects_non_array() {
        let path = std::env::temp_dir().join(format!("polyfund-markets-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"id": "1"}"#).unwrap();

        let result = StaticMarkets::from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
