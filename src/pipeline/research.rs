use serde::Deserialize;
use std::path::Path;

use crate::allocation::{lenient, ConfidenceMap};
use crate::common::errors::Result;

/// A source article cited by the research step
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EvidenceItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Output of the research oracle for one topic
///
/// Produced outside this crate (LLM summarization over web search) and
/// handed over as JSON. `judgments` may be incomplete or malformed; it is
/// validated entry by entry when deserialized, and a map that is not an
/// object at all counts as "no opinion".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "ResearchPayload")]
pub struct Research {
    /// Search keywords for market discovery
    pub keywords: Vec<String>,
    /// Free-text analysis shown in the report
    pub summary: String,
    pub risk_flags: Vec<String>,
    pub evidence_items: Vec<EvidenceItem>,
    /// Candidate event slugs found by web search, used when keyword
    /// discovery comes back empty
    pub event_slugs: Vec<String>,
    /// Per-market judgments keyed by question or event title
    pub judgments: ConfidenceMap,
}

/// Wire shape; older producers name the map `event_rationales`
#[derive(Deserialize)]
struct ResearchPayload {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    risk_flags: Vec<String>,
    #[serde(default)]
    evidence_items: Vec<EvidenceItem>,
    #[serde(default)]
    event_slugs: Vec<String>,
    #[serde(default, deserialize_with = "lenient::confidence_map")]
    judgments: ConfidenceMap,
    #[serde(default, deserialize_with = "lenient::confidence_map")]
    event_rationales: ConfidenceMap,
}

impl From<ResearchPayload> for Research {
    fn from(payload: ResearchPayload) -> Self {
        // `judgments` wins on a key present in both
        let mut judgments = payload.event_rationales;
        judgments.extend(payload.judgments);

        Research {
            keywords: payload.keywords,
            summary: payload.summary,
            risk_flags: payload.risk_flags,
            evidence_items: payload.evidence_items,
            event_slugs: payload.event_slugs,
            judgments,
        }
    }
}

impl Research {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}
