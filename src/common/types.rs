//! Shared market and risk types used by the filter, the engine and the client

use serde::{Deserialize, Serialize};

use super::price::{self, lenient};

/// Binary outcome a position is taken on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    #[default]
    Yes,
    No,
}

impl Outcome {
    /// Parse a side label from untrusted text ("YES", "no", " Yes ")
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "YES" => Some(Outcome::Yes),
            "NO" => Some(Outcome::No),
            _ => None,
        }
    }

    /// Label as it appears in a market's outcome list
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Yes => "Yes",
            Outcome::No => "No",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Yes => write!(f, "YES"),
            Outcome::No => write!(f, "NO"),
        }
    }
}

/// Order side
///
/// The allocator only sizes entries, so every trade it emits is a buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
        }
    }
}

/// A market listing as returned by the discovery service
///
/// Every field is parsed leniently: numbers may arrive as strings, the
/// outcome lists may arrive as JSON-encoded strings, and anything that does
/// not parse falls back to an empty/absent value instead of failing the
/// whole payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Market {
    /// Opaque market identifier
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Human-readable market question
    #[serde(default, deserialize_with = "lenient::string")]
    pub question: String,
    /// Title of the parent event, used as the grouping key
    #[serde(default, alias = "eventTitle", deserialize_with = "lenient::opt_string")]
    pub event_title: Option<String>,
    /// Slug of the parent event, used to rebuild the event URL
    #[serde(default, alias = "eventSlug", deserialize_with = "lenient::opt_string")]
    pub event_slug: Option<String>,
    /// Liquidity in USD
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub liquidity: Option<f64>,
    /// Traded volume in USD
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub volume: Option<f64>,
    /// Outcome labels, parallel to `outcome_prices`
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub outcomes: Vec<String>,
    /// Outcome prices in [0, 1], parallel to `outcomes`
    #[serde(default, alias = "outcomePrices", deserialize_with = "lenient::string_list")]
    pub outcome_prices: Vec<String>,
}

impl Market {
    /// Liquidity used for risk checks; absent or unparseable counts as zero
    pub fn effective_liquidity(&self) -> f64 {
        self.liquidity.unwrap_or(0.0)
    }

    /// Last traded price of `outcome` on a 0-100 scale, 0.0 when unknown
    pub fn outcome_price(&self, outcome: Outcome) -> f64 {
        price::get_outcome_price(self, outcome.label())
    }
}

/// Static risk limits applied to one allocation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Cap on any single target's weight, in [0, 1]
    pub max_position_pct: f64,
    /// Minimum market liquidity in USD
    pub min_liquidity_usd: f64,
    /// Maximum bid-ask spread allowed
    pub max_spread_pct: f64,
}

impl RiskLimits {
    pub fn new(max_position_pct: f64, min_liquidity_usd: f64, max_spread_pct: f64) -> Self {
        Self {
            max_position_pct,
            min_liquidity_usd,
            max_spread_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_parse() {
        assert_eq!(Outcome::parse("YES"), Some(Outcome::Yes));
        assert_eq!(Outcome::parse(" no "), Some(Outcome::No));
        assert_eq!(Outcome::parse("maybe"), None);
        assert_eq!(Outcome::No.to_string(), "NO");
    }

    #[test]
    fn test_market_lenient_deserialization() {
        let raw = r#"{
            "id": 12345,
            "question": "Will it rain tomorrow?",
            "liquidity": "2500.5",
            "volume": 10000,
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0.65\", \"0.35\"]"
        }"#;

        let market: Market = serde_json::from_str(raw).unwrap();
        assert_eq!(market.id, "12345");
        assert_eq!(market.liquidity, Some(2500.5));
        assert_eq!(market.volume, Some(10000.0));
        assert_eq!(market.outcomes, vec!["Yes", "No"]);
        assert_eq!(market.outcome_prices, vec!["0.65", "0.35"]);
        assert_eq!(market.event_title, None);
    }

    #[test]
    fn test_market_garbage_fields_default() {
        let raw = r#"{
            "id": "m1",
            "question": null,
            "liquidity": "lots",
            "outcomes": "not json",
            "outcomePrices": {"yes": 0.5}
        }"#;

        let market: Market = serde_json::from_str(raw).unwrap();
        assert_eq!(market.question, "");
        assert_eq!(market.liquidity, None);
        assert_eq!(market.effective_liquidity(), 0.0);
        assert!(market.outcomes.is_empty());
        assert!(market.outcome_prices.is_empty());
        assert_eq!(market.outcome_price(Outcome::Yes), 0.0);
    }
}
