//! Grounding evaluation: raw versus grounded keywords for a batch of queries.
//!
//! Each query is planned (extraction plus grounding) without searching, and
//! the row records whether grounding changed the keyword set.

use std::collections::BTreeSet;
use std::io;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::models::SearchPlan;
use crate::planner::QueryPlanner;

/// Queries used when none are given: clean, misspelled, multi-constraint,
/// non-English and out-of-vocabulary input.
pub const DEFAULT_QUERIES: [&str; 6] = [
    "Find papers about Granite from MIT",
    "Research on Grnite and Bsallt",
    "Sdimetary basin analysis",
    "Recent articles by author John Smith on Plate Tctnics",
    "帮我找关于 火成岩 的论文",
    "Papers about UnknowxxxxThing",
];

/// Separator for keyword lists inside a single cell.
const LIST_SEPARATOR: &str = "; ";

/// Outcome of planning one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationRow {
    /// The user query.
    pub query: String,
    /// Keywords as extracted.
    pub keywords_raw: Vec<String>,
    /// Keywords after grounding.
    pub keywords_grounded: Vec<String>,
    /// Institution from the plan's filters.
    pub institution: Option<String>,
    /// Year lower bound from the plan's filters.
    pub year_start: Option<i32>,
    /// Wall time spent planning.
    pub elapsed: Duration,
}

impl EvaluationRow {
    /// Build a row from a finished plan.
    #[must_use]
    pub fn from_plan(query: impl Into<String>, plan: &SearchPlan, elapsed: Duration) -> Self {
        Self {
            query: query.into(),
            keywords_raw: plan.keywords_raw().to_vec(),
            keywords_grounded: plan.keywords_grounded().to_vec(),
            institution: plan.filters().institution.clone(),
            year_start: plan.filters().year_start,
            elapsed,
        }
    }

    /// Whether grounding changed the keyword set. Order and duplicates are ignored.
    #[must_use]
    pub fn corrected(&self) -> bool {
        let raw: BTreeSet<&str> = self.keywords_raw.iter().map(String::as_str).collect();
        let grounded: BTreeSet<&str> = self.keywords_grounded.iter().map(String::as_str).collect();
        raw != grounded
    }

    /// Status cell: `corrected` or `-`.
    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.corrected() { "corrected" } else { "-" }
    }

    /// Raw keywords joined into one cell.
    #[must_use]
    pub fn raw_cell(&self) -> String {
        self.keywords_raw.join(LIST_SEPARATOR)
    }

    /// Grounded keywords joined into one cell.
    #[must_use]
    pub fn grounded_cell(&self) -> String {
        self.keywords_grounded.join(LIST_SEPARATOR)
    }
}

/// Plan one query and time it.
pub async fn evaluate(planner: &QueryPlanner, query: &str) -> EvaluationRow {
    let started = Instant::now();
    let plan = planner.plan(query).await;
    EvaluationRow::from_plan(query, &plan, started.elapsed())
}

/// Plan each query in turn.
pub async fn evaluate_all<S: AsRef<str>>(
    planner: &QueryPlanner,
    queries: &[S],
) -> Vec<EvaluationRow> {
    let mut rows = Vec::with_capacity(queries.len());
    for (index, query) in queries.iter().enumerate() {
        let query = query.as_ref();
        tracing::info!(index = index + 1, total = queries.len(), query, "Evaluating query");
        rows.push(evaluate(planner, query).await);
    }
    rows
}

/// Write rows as CSV with a header line.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_csv<W: io::Write>(rows: &[EvaluationRow], writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "status",
        "query",
        "keywords_raw",
        "keywords_grounded",
        "institution",
        "year_start",
        "seconds",
    ])?;

    for row in rows {
        writer.write_record([
            row.status().to_string(),
            row.query.clone(),
            row.raw_cell(),
            row.grounded_cell(),
            row.institution.clone().unwrap_or_default(),
            row.year_start.map(|y| y.to_string()).unwrap_or_default(),
            format!("{:.2}", row.elapsed.as_secs_f64()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
