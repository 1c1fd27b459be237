use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use super::judgment::{self, ConfidenceMap};
use super::sizing;
use super::types::{
    AllocationPlan, Candidate, EngineSettings, SizingMode, TargetAllocation, Trade,
    DEFAULT_CONFIDENCE, MAX_PICKS_PER_EVENT,
};
use crate::common::types::{Market, Outcome, RiskLimits, Side};

pub const NO_MARKETS_WARNING: &str = "No markets passed the risk filter.";
pub const BELOW_THRESHOLD_WARNING: &str = "No markets met the confidence threshold.";

const TRADE_REASON: &str = "Initial entry";

/// Converts filtered markets and research judgments into an allocation plan
///
/// Three phases:
/// 1. resolve a judgment per market and drop anything under the conviction
///    threshold,
/// 2. keep the most confident candidate per event title,
/// 3. size the picks and emit one BUY per target.
///
/// The engine is a pure function of its inputs: no I/O, no randomness, and
/// identical inputs always produce an identical plan.
#[derive(Debug, Clone, Default)]
pub struct AllocationEngine {
    settings: EngineSettings,
}

impl AllocationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[instrument(skip_all, fields(markets = markets.len(), bankroll = bankroll))]
    pub fn allocate(
        &self,
        markets: &[Market],
        bankroll: f64,
        limits: &RiskLimits,
        confidence: &ConfidenceMap,
    ) -> AllocationPlan {
        if markets.is_empty() {
            return AllocationPlan::empty_with_warning(NO_MARKETS_WARNING);
        }

        let candidates = self.score_candidates(markets, confidence);
        if candidates.is_empty() {
            info!(
                threshold = self.settings.conviction_threshold,
                "No candidate met the conviction threshold"
            );
            return AllocationPlan::empty_with_warning(BELOW_THRESHOLD_WARNING);
        }

        let picks = pick_per_event(candidates);
        info!(events = picks.len(), "Selected one candidate per event");

        let mut weights = match self.settings.sizing_mode {
            SizingMode::ConfidenceWeighted => {
                let confidences: Vec<u8> = picks.iter().map(|c| c.confidence).collect();
                sizing::confidence_weights(&confidences)
            }
            SizingMode::EqualWeight => sizing::equal_weights(picks.len()),
        };

        let capped = match self.settings.sizing_mode {
            SizingMode::EqualWeight => true,
            SizingMode::ConfidenceWeighted => self.settings.enforce_position_cap,
        };
        let removed = if capped {
            sizing::apply_position_cap(&mut weights, limits.max_position_pct)
        } else {
            0.0
        };

        build_plan(&picks, &weights, bankroll, limits, removed)
    }

    /// Phase 1: attach judgments and apply the conviction cutoff
    fn score_candidates(&self, markets: &[Market], confidence: &ConfidenceMap) -> Vec<Candidate> {
        markets
            .iter()
            .enumerate()
            .filter_map(|(position, market)| {
                let candidate = resolve_candidate(market, position, confidence);
                if candidate.confidence < self.settings.conviction_threshold {
                    debug!(
                        market_id = %market.id,
                        confidence = candidate.confidence,
                        "Dropped candidate below conviction threshold"
                    );
                    return None;
                }
                Some(candidate)
            })
            .collect()
    }
}

/// Allocate with the default engine settings
pub fn allocate(
    markets: &[Market],
    bankroll: f64,
    limits: &RiskLimits,
    confidence: &ConfidenceMap,
) -> AllocationPlan {
    AllocationEngine::default().allocate(markets, bankroll, limits, confidence)
}

fn resolve_candidate(market: &Market, position: usize, judgments: &ConfidenceMap) -> Candidate {
    let found = judgment::lookup(judgments, market);

    let (outcome, confidence, citation_url) = match found {
        Some(j) => (j.side(), j.confidence(), j.citation_url().map(str::to_string)),
        None => (Outcome::Yes, DEFAULT_CONFIDENCE, None),
    };

    let rationale = match found.map(|j| j.reasoning().trim()) {
        Some(reasoning) if !reasoning.is_empty() => reasoning.to_string(),
        _ => format!("No research judgment for \"{}\"", market.question),
    };

    Candidate {
        market: market.clone(),
        outcome,
        rationale,
        confidence,
        citation_url,
        position,
    }
}

/// Phase 2: keep the most confident candidate(s) of each event
///
/// Markets without an event title all share a single group. Ties keep the
/// candidate that came first in the input. The result is ordered by event
/// title, untitled group first.
fn pick_per_event(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut groups: BTreeMap<Option<String>, Vec<Candidate>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry(candidate.market.event_title.clone())
            .or_default()
            .push(candidate);
    }

    groups
        .into_values()
        .flat_map(|mut group| {
            group.sort_by(|a, b| {
                b.confidence
                    .cmp(&a.confidence)
                    .then(a.position.cmp(&b.position))
            });
            group.truncate(MAX_PICKS_PER_EVENT);
            group
        })
        .collect()
}

/// Phase 3 output: targets, trades and the summary warning
///
/// `capped_weight` is the bankroll fraction the position cap took away.
fn build_plan(
    picks: &[Candidate],
    weights: &[f64],
    bankroll: f64,
    limits: &RiskLimits,
    capped_weight: f64,
) -> AllocationPlan {
    let mut plan = AllocationPlan::default();

    for (pick, &weight) in picks.iter().zip(weights) {
        let market = &pick.market;

        plan.targets.push(TargetAllocation {
            market_id: market.id.clone(),
            market_slug: market.event_slug.clone(),
            event_title: market.event_title.clone(),
            question: market.question.clone(),
            outcome: pick.outcome,
            weight,
            rationale: format!("{} (Confidence: {}%)", pick.rationale, pick.confidence),
            citation_url: pick.citation_url.clone(),
            volume: market.volume.unwrap_or(0.0),
            liquidity: market.effective_liquidity(),
            price: market.outcome_price(pick.outcome),
        });

        plan.trades.push(Trade {
            market_id: market.id.clone(),
            outcome: pick.outcome,
            side: Side::Buy,
            amount_usd: weight * bankroll,
            reason: TRADE_REASON.to_string(),
        });
    }

    let allocated = plan.total_allocated_usd();
    plan.warnings.push(format!(
        "Allocated ${:.2} of ${:.2} bankroll across {} event(s).",
        allocated,
        bankroll,
        plan.targets.len()
    ));

    if capped_weight > 1e-9 {
        plan.warnings.push(format!(
            "Position cap of {:.1}% left ${:.2} unallocated.",
            limits.max_position_pct * 100.0,
            capped_weight * bankroll
        ));
    }

    info!(
        targets = plan.targets.len(),
        allocated_usd = allocated,
        "Allocation plan built"
    );
    plan
}
