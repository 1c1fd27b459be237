//! Allocation module: risk filtering and confidence-weighted sizing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    MarketFilter                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  raw markets ──► liquidity floor ──► spread ceiling ──►     │
//! │                  (missing = 0)       (SpreadProvider)       │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AllocationEngine                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  1. Judgment lookup (question, then event title)            │
//! │     confidence < threshold ──► dropped                      │
//! │  2. One pick per event title (highest confidence)           │
//! │  3. Sizing: min-max confidence shares, residual to last     │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  AllocationPlan { targets, trades, warnings }               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both stages are synchronous and side-effect free, so they can run
//! concurrently for independent requests without any locking.
//!
//! # Example
//!
//! ```
//! use polyfund::allocation::{allocate, filter_markets, ConfidenceMap, Judgment};
//! use polyfund::common::types::{Market, Outcome, RiskLimits};
//!
//! let limits = RiskLimits::new(0.25, 1000.0, 0.05);
//! let markets = vec![Market {
//!     id: "1".to_string(),
//!     question: "Will it rain tomorrow?".to_string(),
//!     event_title: Some("Weather".to_string()),
//!     liquidity: Some(5000.0),
//!     ..Default::default()
//! }];
//!
//! let mut judgments = ConfidenceMap::new();
//! judgments.insert(
//!     "Will it rain tomorrow?".to_string(),
//!     Judgment::structured(Outcome::Yes, "Storm front arriving", 85),
//! );
//!
//! let passing = filter_markets(markets, &limits);
//! let plan = allocate(&passing, 1000.0, &limits, &judgments);
//! assert_eq!(plan.targets.len(), 1);
//! assert_eq!(plan.targets[0].weight, 1.0);
//! ```

mod engine;
mod filter;
mod judgment;
mod sizing;
mod types;

pub use engine::{allocate, AllocationEngine, BELOW_THRESHOLD_WARNING, NO_MARKETS_WARNING};

pub use filter::{
    filter_markets,
    MarketFilter,
    PlaceholderSpread,
    SpreadProvider,
    PLACEHOLDER_SPREAD,
};

pub(crate) use judgment::lenient;
pub use judgment::{confidence_map_from_value, lookup, parse_confidence, ConfidenceMap, Judgment};

pub use sizing::{apply_position_cap, confidence_weights, equal_weights, normalize_with_residual};

pub use types::{
    AllocationPlan,
    Candidate,
    EngineSettings,
    SizingMode,
    TargetAllocation,
    Trade,
    CONVICTION_THRESHOLD,
    DEFAULT_CONFIDENCE,
    MAX_PICKS_PER_EVENT,
};
