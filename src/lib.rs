//! Polyfund Library
//!
//! Turns a research result (keywords plus per-market LLM judgments) into a
//! risk-bounded prediction market portfolio: discover markets on Polymarket,
//! filter them by liquidity and spread, then size one position per event.

pub mod allocation;
pub mod common;
pub mod config;
pub mod pipeline;
pub mod polymarket;
pub mod report;

// Re-export commonly used types
pub use common::errors::{PolyfundError, Result};
pub use common::traits::{MarketQuery, MarketSource};
pub use common::types::{Market, Outcome, RiskLimits, Side};
pub use config::types::AppConfig;
pub use polymarket::rest::GammaClient;

// Allocation types
pub use allocation::{
    allocate, filter_markets, AllocationEngine, AllocationPlan, ConfidenceMap, EngineSettings,
    Judgment, MarketFilter, SizingMode, SpreadProvider, TargetAllocation, Trade,
};
pub use pipeline::{RebalanceOutcome, Rebalancer, Research, StaticMarkets};
