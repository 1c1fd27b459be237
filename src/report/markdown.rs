//! Markdown recommendation report

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::allocation::{AllocationPlan, TargetAllocation};
use crate::pipeline::Research;

const EVENT_URL_BASE: &str = "https://polymarket.com/event/";
const UNGROUPED_EVENT: &str = "Other";

/// Render the recommendation for a plan, stamped with the current time
pub fn format_recommendation(plan: &AllocationPlan, research: &Research, portfolio_name: &str) -> String {
    format_recommendation_at(plan, research, portfolio_name, Utc::now())
}

/// Render the recommendation for a plan with an explicit timestamp
pub fn format_recommendation_at(
    plan: &AllocationPlan,
    research: &Research,
    portfolio_name: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "## Portfolio Recommendation: {}", portfolio_name);
    let _ = writeln!(out, "_Generated {}_", generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out);

    let _ = writeln!(out, "### Research Summary");
    let _ = writeln!(out, "{}", research.summary);
    let _ = writeln!(out);

    let _ = writeln!(out, "### Strategic Allocation");
    if plan.targets.is_empty() {
        let _ = writeln!(out, "No suitable markets found matching risk criteria.");
        let _ = writeln!(out);
    } else {
        let mut by_event: BTreeMap<&str, Vec<&TargetAllocation>> = BTreeMap::new();
        for target in &plan.targets {
            let event = target.event_title.as_deref().unwrap_or(UNGROUPED_EVENT);
            by_event.entry(event).or_default().push(target);
        }

        for (event, targets) in by_event {
            let _ = writeln!(out, "**Event: {}**", event);
            for target in targets {
                write_target(&mut out, target);
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(out, "### Risk Warnings");
    for warning in plan.warnings.iter().chain(&research.risk_flags) {
        let _ = writeln!(out, "- {}", warning);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "### Sources");
    for item in &research.evidence_items {
        let _ = writeln!(
            out,
            "- [{}]({})",
            item.title.as_deref().unwrap_or("Article"),
            item.url.as_deref().unwrap_or("#")
        );
    }

    out.trim_end().to_string()
}

fn write_target(out: &mut String, target: &TargetAllocation) {
    let url = match &target.market_slug {
        Some(slug) => format!("{}{}", EVENT_URL_BASE, slug),
        None => "#".to_string(),
    };
    let label = if target.question.is_empty() {
        &target.market_id
    } else {
        &target.question
    };

    let _ = writeln!(
        out,
        "- **{:.1}%** on [{}]({}) ({})",
        target.weight * 100.0,
        label,
        url,
        target.outcome
    );
    let _ = writeln!(
        out,
        "  - *Market*: price {:.1}, volume ${:.0}, liquidity ${:.0}",
        target.price, target.volume, target.liquidity
    );
    if !target.rationale.is_empty() {
        let _ = writeln!(out, "  - *Reasoning*: {}", target.rationale);
    }
    if let Some(citation) = &target.citation_url {
        let _ = writeln!(out, "  - *Source*: [{}]({})", citation, citation);
    }
}
