//! Rebalance pipeline: research → discovery → filter → allocation

mod rebalancer;
mod research;
mod source;

pub use rebalancer::{RebalanceOutcome, Rebalancer};
pub use research::{EvidenceItem, Research};
pub use source::StaticMarkets;
