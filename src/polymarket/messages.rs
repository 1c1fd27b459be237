//! Gamma API payload types

use serde::{Deserialize, Serialize};

use crate::common::price::lenient;
use crate::common::types::Market;

/// Event from the Gamma API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GammaEvent {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub slug: Option<String>,
    #[serde(default)]
    pub markets: Option<Vec<Market>>,
}

impl GammaEvent {
    /// Markets of this event, stamped with the event's slug and title
    pub fn into_markets(self) -> Vec<Market> {
        let GammaEvent {
            title,
            slug,
            markets,
            ..
        } = self;

        markets
            .unwrap_or_default()
            .into_iter()
            .map(|mut m| {
                m.event_slug = slug.clone();
                m.event_title = title.clone();
                m
            })
            .collect()
    }
}

/// `/events` responses come either as a bare array or wrapped
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GammaEventsResponse {
    List(Vec<GammaEvent>),
    Wrapped {
        #[serde(default)]
        data: Option<Vec<GammaEvent>>,
        #[serde(default)]
        events: Option<Vec<GammaEvent>>,
    },
}

impl GammaEventsResponse {
    pub fn into_events(self) -> Vec<GammaEvent> {
        match self {
            GammaEventsResponse::List(events) => events,
            GammaEventsResponse::Wrapped { data, events } => data.or(events).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_markets_inherit_event_fields() {
        let raw = r#"[{
            "id": "ev1",
            "title": "NBA Finals",
            "slug": "nba-finals",
            "markets": [
                {"id": "m1", "question": "Will the Celtics win?", "liquidity": "1200"},
                {"id": "m2", "question": "Will the Lakers win?"}
            ]
        }]"#;

        let response: GammaEventsResponse = serde_json::from_str(raw).unwrap();
        let markets: Vec<Market> = response
            .into_events()
            .into_iter()
            .flat_map(GammaEvent::into_markets)
            .collect();

        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].event_title.as_deref(), Some("NBA Finals"));
        assert_eq!(markets[1].event_slug.as_deref(), Some("nba-finals"));
        assert_eq!(markets[0].liquidity, Some(1200.0));
    }

    #[test]
    fn test_wrapped_response() {
        let raw = r#"{"data": [{"id": 7, "title": "Weather"}]}"#;
        let events = serde_json::from_str::<GammaEventsResponse>(raw)
            .unwrap()
            .into_events();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "7");
        assert!(events[0].clone().into_markets().is_empty());
    }
}
