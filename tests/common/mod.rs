//! Common test utilities and fixtures

#![allow(dead_code)]

use once_cell::sync::Lazy;
use polyfund::allocation::{ConfidenceMap, Judgment};
use polyfund::common::types::{Market, Outcome, RiskLimits};

/// Build a binary market with healthy liquidity
pub fn sample_market(id: &str, event_title: Option<&str>, question: &str) -> Market {
    Market {
        id: id.to_string(),
        question: question.to_string(),
        event_title: event_title.map(str::to_string),
        event_slug: event_title.map(|t| t.to_lowercase().replace(' ', "-")),
        liquidity: Some(25_000.0),
        volume: Some(150_000.0),
        outcomes: vec!["Yes".to_string(), "No".to_string()],
        outcome_prices: vec!["0.55".to_string(), "0.45".to_string()],
    }
}

/// Limits that never bind the engine (full position cap, no liquidity floor)
pub fn loose_limits() -> RiskLimits {
    RiskLimits::new(1.0, 0.0, 0.05)
}

/// YES judgments with the given confidences, keyed by question
pub fn yes_judgments(entries: &[(&str, u8)]) -> ConfidenceMap {
    entries
        .iter()
        .map(|(question, confidence)| {
            (
                question.to_string(),
                Judgment::structured(Outcome::Yes, format!("Analysis of {}", question), *confidence),
            )
        })
        .collect()
}

/// A tournament with several correlated markets plus two standalone events
pub static TOURNAMENT_MARKETS: Lazy<Vec<Market>> = Lazy::new(|| {
    vec![
        sample_market("t1", Some("World Cup Winner"), "Will Brazil win the World Cup?"),
        sample_market("t2", Some("World Cup Winner"), "Will France win the World Cup?"),
        sample_market("t3", Some("World Cup Winner"), "Will Japan win the World Cup?"),
        sample_market("f1", Some("Fed Decision"), "Will the Fed cut rates in March?"),
        sample_market("e1", Some("Election"), "Will the incumbent win?"),
    ]
});

/// Sample API responses for testing
pub mod api_responses {
    /// Keyword search: one relevant event, one irrelevant event
    pub const KEYWORD_EVENTS: &str = r#"[
        {
            "id": "100",
            "title": "Bitcoin price end of year",
            "slug": "bitcoin-price-eoy",
            "markets": [
                {
                    "id": "m1",
                    "question": "Will BTC close the year above $100k?",
                    "liquidity": "45000.12",
                    "volume": "900000",
                    "outcomes": "[\"Yes\", \"No\"]",
                    "outcomePrices": "[\"0.42\", \"0.58\"]"
                }
            ]
        },
        {
            "id": "101",
            "title": "Oscars Best Picture",
            "slug": "oscars-best-picture",
            "markets": [
                {"id": "m9", "question": "Will Dune win Best Picture?", "liquidity": "3000"}
            ]
        }
    ]"#;

    /// Firehose: repeats m1 and adds a new relevant market
    pub const FIREHOSE_EVENTS: &str = r#"{
        "data": [
            {
                "id": "100",
                "title": "Bitcoin price end of year",
                "slug": "bitcoin-price-eoy",
                "markets": [
                    {"id": "m1", "question": "Will BTC close the year above $100k?", "liquidity": "45000.12"},
                    {"id": "m2", "question": "Will BTC close the year below $50k?", "liquidity": 12000}
                ]
            }
        ]
    }"#;

    /// Single event fetched by slug
    pub const SLUG_EVENT: &str = r#"[
        {
            "id": "200",
            "title": "ETH ETF approval",
            "slug": "eth-etf-approval",
            "markets": [
                {"id": "m20", "question": "Will an ETH ETF be approved by June?", "liquidity": "8000"}
            ]
        }
    ]"#;
}
