//! Price and outcome parsing for loosely-typed market payloads
//!
//! Discovery payloads carry numbers as strings and outcome lists as
//! JSON-encoded strings (`"[\"Yes\", \"No\"]"`). Everything here degrades to
//! a neutral value instead of failing.

use serde_json::Value;

use super::types::Market;

/// Render a scalar JSON value as a string (strings as-is, numbers formatted)
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a finite number from a JSON number or a numeric string
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parse a list of labels or prices
///
/// Accepts a JSON array or a string containing a JSON array. Non-scalar
/// items are skipped; anything else yields an empty list.
pub fn parse_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_to_string).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Title-case a label: "YES" -> "Yes", "new york" -> "New York"
pub fn title_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Price of `outcome` in `market` on a 0-100 scale
///
/// The label is matched against the market's outcome list after title-case
/// normalization, so "YES", "yes" and "Yes" are the same outcome. A missing
/// label, a missing price at that index or an unparseable price all give 0.0.
pub fn get_outcome_price(market: &Market, outcome: &str) -> f64 {
    let wanted = title_case(outcome);

    market
        .outcomes
        .iter()
        .position(|label| title_case(label) == wanted)
        .and_then(|idx| market.outcome_prices.get(idx))
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .map(|p| p * 100.0)
        .unwrap_or(0.0)
}

/// `deserialize_with` helpers that never reject a field
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::value_to_string(&value).unwrap_or_default())
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::value_to_string(&value))
    }

    pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::parse_number(&value))
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::parse_string_list(&value))
    }
}
