use serde::{Deserialize, Serialize};

use crate::common::types::{Market, Outcome, Side};

/// Minimum confidence a candidate needs to be eligible for allocation
pub const CONVICTION_THRESHOLD: u8 = 70;

/// Confidence assumed when the research oracle gives no usable score
pub const DEFAULT_CONFIDENCE: u8 = 50;

/// Number of candidates kept per event
pub const MAX_PICKS_PER_EVENT: usize = 1;

/// How surviving picks are sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    /// Min-max normalized confidence shares (lowest pick gets zero)
    #[default]
    ConfidenceWeighted,
    /// `min(1/N, max_position_pct)` per pick, remainder stays in cash
    EqualWeight,
}

/// Tunables for the allocation engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Candidates below this confidence are dropped
    #[serde(default = "default_conviction_threshold")]
    pub conviction_threshold: u8,
    #[serde(default)]
    pub sizing_mode: SizingMode,
    /// Clamp confidence-weighted positions to `max_position_pct`.
    /// Off by default: the confidence-weighted path historically ignores the
    /// cap, and clamping breaks the sum-to-one property of the plan.
    #[serde(default)]
    pub enforce_position_cap: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            conviction_threshold: CONVICTION_THRESHOLD,
            sizing_mode: SizingMode::default(),
            enforce_position_cap: false,
        }
    }
}

fn default_conviction_threshold() -> u8 {
    CONVICTION_THRESHOLD
}

/// A market enriched with the research oracle's resolved judgment
///
/// Built fresh for each allocation run and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub market: Market,
    pub outcome: Outcome,
    pub rationale: String,
    pub confidence: u8,
    pub citation_url: Option<String>,
    /// Index of the market in the engine's input, used for tie-breaks
    pub position: usize,
}

/// Target weight for one market in the final plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAllocation {
    pub market_id: String,
    #[serde(default)]
    pub market_slug: Option<String>,
    #[serde(default)]
    pub event_title: Option<String>,
    #[serde(default)]
    pub question: String,
    pub outcome: Outcome,
    /// Fraction of the bankroll, in [0, 1]
    pub weight: f64,
    pub rationale: String,
    #[serde(default)]
    pub citation_url: Option<String>,
    /// Market volume in USD (display only)
    #[serde(default)]
    pub volume: f64,
    /// Market liquidity in USD (display only)
    #[serde(default)]
    pub liquidity: f64,
    /// Last price of the chosen outcome, 0-100 (display only)
    #[serde(default)]
    pub price: f64,
}

/// Order derived from a target allocation
///
/// `amount_usd` stays an `f64`: it is `weight * bankroll` with weights
/// that are float fractions checked against a tolerance, and no order is
/// placed from it here. Convert at the edge that submits orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub market_id: String,
    pub outcome: Outcome,
    pub side: Side,
    pub amount_usd: f64,
    pub reason: String,
}

/// Output of one allocation run
///
/// `targets` and `trades` are parallel. `warnings` is the only channel
/// through which empty or degraded runs are reported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub targets: Vec<TargetAllocation>,
    pub trades: Vec<Trade>,
    pub warnings: Vec<String>,
}

impl AllocationPlan {
    /// A plan with no positions and a single explanatory warning
    pub fn empty_with_warning(warning: impl Into<String>) -> Self {
        Self {
            targets: Vec::new(),
            trades: Vec::new(),
            warnings: vec![warning.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Sum of all target weights
    pub fn total_weight(&self) -> f64 {
        self.targets.iter().map(|t| t.weight).sum()
    }

    /// Sum of all trade amounts
    pub fn total_allocated_usd(&self) -> f64 {
        self.trades.iter().map(|t| t.amount_usd).sum()
    }
}
