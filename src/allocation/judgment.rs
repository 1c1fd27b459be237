//! Research oracle judgments
//!
//! The oracle is an LLM, so its output is treated as untrusted input. A map
//! entry is either an object (`{"side": "YES", "reasoning": "...",
//! "confidence": 82}`) or a bare string. Every field is validated here, once,
//! and replaced by a default when it is missing or out of range.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

use super::types::DEFAULT_CONFIDENCE;
use crate::common::price::parse_number;
use crate::common::types::{Market, Outcome};

/// Judgments keyed by market question or event title
pub type ConfidenceMap = HashMap<String, Judgment>;

/// Keys checked, in order, for a supporting source URL
const CITATION_KEYS: [&str; 4] = ["citation_url", "citation", "source_url", "url"];

/// One validated judgment from the research oracle
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Judgment {
    /// Structured verdict with a side and a score
    Structured {
        side: Outcome,
        reasoning: String,
        confidence: u8,
        citation_url: Option<String>,
    },
    /// Free-form analysis with no score
    FreeText { reasoning: String },
}

impl Judgment {
    pub fn structured(side: Outcome, reasoning: impl Into<String>, confidence: u8) -> Self {
        Judgment::Structured {
            side,
            reasoning: reasoning.into(),
            confidence: confidence.min(100),
            citation_url: None,
        }
    }

    pub fn free_text(reasoning: impl Into<String>) -> Self {
        Judgment::FreeText {
            reasoning: reasoning.into(),
        }
    }

    pub fn side(&self) -> Outcome {
        match self {
            Judgment::Structured { side, .. } => *side,
            Judgment::FreeText { .. } => Outcome::Yes,
        }
    }

    pub fn confidence(&self) -> u8 {
        match self {
            Judgment::Structured { confidence, .. } => *confidence,
            Judgment::FreeText { .. } => DEFAULT_CONFIDENCE,
        }
    }

    pub fn reasoning(&self) -> &str {
        match self {
            Judgment::Structured { reasoning, .. } | Judgment::FreeText { reasoning } => reasoning,
        }
    }

    pub fn citation_url(&self) -> Option<&str> {
        match self {
            Judgment::Structured { citation_url, .. } => citation_url.as_deref(),
            Judgment::FreeText { .. } => None,
        }
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        let side = map
            .get("side")
            .and_then(Value::as_str)
            .and_then(Outcome::parse)
            .unwrap_or_default();

        let reasoning = map
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let confidence = map
            .get("confidence")
            .map(parse_confidence)
            .unwrap_or(DEFAULT_CONFIDENCE);

        let citation_url = CITATION_KEYS
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|url| !url.is_empty())
            .map(str::to_string);

        Judgment::Structured {
            side,
            reasoning,
            confidence,
            citation_url,
        }
    }
}

impl From<Value> for Judgment {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Judgment::from_object(&map),
            Value::String(reasoning) => Judgment::FreeText { reasoning },
            // Numbers, arrays, null: no usable opinion
            _ => Judgment::FreeText {
                reasoning: String::new(),
            },
        }
    }
}

/// Parse a 0-100 confidence score from untrusted JSON
///
/// Accepts integers, floats (truncated) and numeric strings with an
/// optional trailing `%`. Anything else, or anything outside 0-100, maps to
/// [`DEFAULT_CONFIDENCE`].
pub fn parse_confidence(value: &Value) -> u8 {
    let number = match value {
        Value::String(s) => parse_number(&Value::String(s.trim().trim_end_matches('%').to_string())),
        other => parse_number(other),
    };

    match number {
        Some(n) if (0.0..=100.0).contains(&n) => n.trunc() as u8,
        _ => DEFAULT_CONFIDENCE,
    }
}

/// Build a confidence map from untrusted JSON
///
/// An object becomes one judgment per key. Anything else (null, a list, a
/// bare string) carries no usable opinion and gives an empty map.
pub fn confidence_map_from_value(value: Value) -> ConfidenceMap {
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, raw)| (key, Judgment::from(raw)))
            .collect(),
        other => {
            warn!("Ignoring confidence map that is not an object: {}", other);
            ConfidenceMap::new()
        }
    }
}

/// `deserialize_with` helper for confidence maps that never fails
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::ConfidenceMap;

    pub fn confidence_map<'de, D>(deserializer: D) -> Result<ConfidenceMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::confidence_map_from_value(value))
    }
}

/// Find the judgment for a market: exact question first, then event title
pub fn lookup<'a>(map: &'a ConfidenceMap, market: &Market) -> Option<&'a Judgment> {
    map.get(&market.question).or_else(|| {
        market
            .event_title
            .as_ref()
            .and_then(|title| map.get(title))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_structured_judgment() {
        let judgment: Judgment = serde_json::from_value(json!({
            "side": "no",
            "reasoning": "Polls moved sharply",
            "confidence": 82,
            "citation_url": "https://example.com/poll"
        }))
        .unwrap();

        assert_eq!(judgment.side(), Outcome::No);
        assert_eq!(judgment.confidence(), 82);
        assert_eq!(judgment.reasoning(), "Polls moved sharply");
        assert_eq!(judgment.citation_url(), Some("https://example.com/poll"));
    }

    #[test]
    fn test_free_text_judgment_defaults() {
        let judgment: Judgment = serde_json::from_value(json!("Looks likely")).unwrap();

        assert_eq!(judgment, Judgment::free_text("Looks likely"));
        assert_eq!(judgment.side(), Outcome::Yes);
        assert_eq!(judgment.confidence(), DEFAULT_CONFIDENCE);
        assert_eq!(judgment.citation_url(), None);
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let judgment: Judgment = serde_json::from_value(json!({
            "side": "MAYBE",
            "reasoning": 42,
            "confidence": "very high"
        }))
        .unwrap();

        assert_eq!(judgment.side(), Outcome::Yes);
        assert_eq!(judgment.reasoning(), "");
        assert_eq!(judgment.confidence(), DEFAULT_CONFIDENCE);

        let judgment: Judgment = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(judgment.confidence(), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_parse_confidence_bounds() {
        assert_eq!(parse_confidence(&json!(0)), 0);
        assert_eq!(parse_confidence(&json!(100)), 100);
        assert_eq!(parse_confidence(&json!(87.9)), 87);
        assert_eq!(parse_confidence(&json!("75")), 75);
        assert_eq!(parse_confidence(&json!("90%")), 90);
        assert_eq!(parse_confidence(&json!(150)), DEFAULT_CONFIDENCE);
        assert_eq!(parse_confidence(&json!(-5)), DEFAULT_CONFIDENCE);
        assert_eq!(parse_confidence(&json!(null)), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_confidence_map_from_non_object_is_empty() {
        assert!(confidence_map_from_value(json!(null)).is_empty());
        assert!(confidence_map_from_value(json!([{"side": "YES"}])).is_empty());
        assert!(confidence_map_from_value(json!("all markets look good")).is_empty());

        let map = confidence_map_from_value(json!({"Q1": {"confidence": 91}, "Q2": 7}));
        assert_eq!(map["Q1"].confidence(), 91);
        assert_eq!(map["Q2"], Judgment::free_text(""));
    }

    #[test]
    fn test_lookup_prefers_question_over_event_title() {
        let market = Market {
            id: "1".to_string(),
            question: "Will Team A win?".to_string(),
            event_title: Some("Championship".to_string()),
            ..Default::default()
        };

        let mut map = ConfidenceMap::new();
        map.insert("Championship".to_string(), Judgment::structured(Outcome::No, "event", 75));
        assert_eq!(lookup(&map, &market).map(Judgment::confidence), Some(75));

        map.insert("Will Team A win?".to_string(), Judgment::structured(Outcome::Yes, "q", 90));
        assert_eq!(lookup(&map, &market).map(Judgment::confidence), Some(90));

        let untitled = Market {
            question: "Unknown".to_string(),
            ..Default::default()
        };
        assert!(lookup(&map, &untitled).is_none());
    }
}
