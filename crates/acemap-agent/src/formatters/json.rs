//! JSON output formatting.

use serde_json::{Value, json};

use crate::agent::AgentOutcome;
use crate::models::{PaperRecord, SearchPlan};

/// Compact paper representation: title, year, citations.
#[must_use]
pub fn compact_paper(paper: &PaperRecord) -> Value {
    json!({
        "title": paper.title_or_default(),
        "year": paper.publication_year,
        "citations": paper.citations(),
    })
}

/// Plan as `{"search_params": {...}, "filters": {...}}`.
#[must_use]
pub fn plan_json(plan: &SearchPlan) -> Value {
    serde_json::to_value(plan).unwrap_or(Value::Null)
}

/// Outcome with compact papers.
#[must_use]
pub fn outcome_json(outcome: &AgentOutcome) -> Value {
    json!({
        "query": outcome.query,
        "plan": plan_json(&outcome.plan),
        "keyword": outcome.choice.keyword,
        "strategy": outcome.choice.source,
        "fetchedTotal": outcome.fetched_total,
        "fetched": outcome.fetched,
        "papers": outcome.papers.iter().map(compact_paper).collect::<Vec<_>>(),
    })
}
