//! Gamma API client tests against a local mock server
//!
//! Covers the keyword search, the volume-ordered firehose supplement, the
//! slug lookup and error mapping, without touching the real API.

mod common;

use common::api_responses::{FIREHOSE_EVENTS, KEYWORD_EVENTS, SLUG_EVENT};
use polyfund::common::traits::{MarketQuery, MarketSource};
use polyfund::{GammaClient, PolyfundError};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn json_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

fn ids(markets: &[polyfund::Market]) -> Vec<&str> {
    markets.iter().map(|m| m.id.as_str()).collect()
}

async fn mount_keyword_search(server: &MockServer, keyword: &str) {
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("q", keyword))
        .and(query_param("closed", "false"))
        .respond_with(json_response(KEYWORD_EVENTS))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_keyword_search_merges_firehose() {
    let server = MockServer::start().await;
    mount_keyword_search(&server, "bitcoin").await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("order", "volume24hr"))
        .respond_with(json_response(FIREHOSE_EVENTS))
        .expect(1)
        .mount(&server)
        .await;

    let client = GammaClient::new(&server.uri()).unwrap();
    let markets = client
        .fetch_markets(&MarketQuery::new(vec!["bitcoin".to_string()]))
        .await
        .unwrap();

    // m9 is irrelevant, m1 appears in both responses
    assert_eq!(ids(&markets), vec!["m1", "m2"]);

    let first = &markets[0];
    assert_eq!(first.event_title.as_deref(), Some("Bitcoin price end of year"));
    assert_eq!(first.event_slug.as_deref(), Some("bitcoin-price-eoy"));
    assert_eq!(first.liquidity, Some(45000.12));
    assert_eq!(first.outcomes, vec!["Yes", "No"]);
    assert!((first.outcome_price(polyfund::Outcome::No) - 58.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_firehose_failure_keeps_keyword_results() {
    let server = MockServer::start().await;
    mount_keyword_search(&server, "bitcoin").await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("order", "volume24hr"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = GammaClient::new(&server.uri()).unwrap();
    let markets = client
        .fetch_markets(&MarketQuery::new(vec!["bitcoin".to_string()]))
        .await
        .unwrap();

    assert_eq!(ids(&markets), vec!["m1"]);
}

#[tokio::test]
async fn test_keyword_search_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = GammaClient::new(&server.uri()).unwrap();
    let result = client
        .fetch_markets(&MarketQuery::new(vec!["bitcoin".to_string()]))
        .await;

    match result {
        Err(PolyfundError::InvalidResponse(msg)) => assert!(msg.contains("500")),
        other => panic!("expected InvalidResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tag_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("tag", "crypto"))
        .respond_with(json_response("[]"))
        .expect(2)
        .mount(&server)
        .await;

    let client = GammaClient::new(&server.uri()).unwrap();
    let query = MarketQuery::new(vec!["bitcoin".to_string()]).with_tag("crypto");
    let markets = client.fetch_markets(&query).await.unwrap();

    assert!(markets.is_empty());
}

#[tokio::test]
async fn test_fetch_event_by_slug_through_trait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("slug", "eth-etf-approval"))
        .respond_with(json_response(SLUG_EVENT))
        .mount(&server)
        .await;

    let client = GammaClient::new(&server.uri()).unwrap();
    let source: &dyn MarketSource = &client;
    let markets = source.fetch_event_by_slug("eth-etf-approval").await.unwrap();

    assert_eq!(source.source_name(), "polymarket-gamma");
    assert_eq!(ids(&markets), vec!["m20"]);
    assert_eq!(markets[0].event_title.as_deref(), Some("ETH ETF approval"));
    assert_eq!(markets[0].effective_liquidity(), 8000.0);
}

#[tokio::test]
async fn test_fetch_market_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets/m1"))
        .respond_with(json_response(
            r#"{"id": "m1", "question": "Will BTC close the year above $100k?", "liquidity": "1200"}"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/markets/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = GammaClient::new(&server.uri()).unwrap();

    let market = client.fetch_market_by_id("m1").await.unwrap();
    assert_eq!(market.liquidity, Some(1200.0));

    let missing = client.fetch_market_by_id("gone").await;
    assert!(matches!(missing, Err(PolyfundError::EventNotFound(id)) if id == "gone"));
}
