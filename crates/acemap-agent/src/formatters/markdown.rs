//! Markdown output formatting.

use crate::agent::{AgentOutcome, Comparison};
use crate::evaluation::EvaluationRow;
use crate::models::{PaperRecord, SearchPlan};

/// Titles longer than this are truncated in tables.
const TITLE_WIDTH: usize = 50;

/// Rows shown in result tables.
const TABLE_ROWS: usize = 5;

/// Baseline titles listed under "Before".
const BASELINE_PREVIEW: usize = 2;

/// Format a plan as a short Markdown summary.
#[must_use]
pub fn format_plan_markdown(plan: &SearchPlan) -> String {
    let mut output = String::new();

    output.push_str(&format!("**Keywords (raw)**: {}\n\n", list_or_none(plan.keywords_raw())));
    output.push_str(&format!(
        "**Keywords (grounded)**: {}\n\n",
        list_or_none(plan.keywords_grounded())
    ));

    let corrections: Vec<String> =
        plan.corrections().map(|(raw, grounded)| format!("`{raw}` -> `{grounded}`")).collect();
    if !corrections.is_empty() {
        output.push_str(&format!("**Corrections**: {}\n\n", corrections.join(", ")));
    }

    let filters = plan.filters();
    let mut meta = Vec::new();
    if let Some(institution) = &filters.institution {
        meta.push(format!("**Institution**: {institution}"));
    }
    if let Some(author) = &filters.author {
        meta.push(format!("**Author**: {author}"));
    }
    if let Some(start) = filters.year_start {
        meta.push(format!("**From**: {start}"));
    }
    if let Some(end) = filters.year_end {
        meta.push(format!("**Until**: {end}"));
    }
    if !meta.is_empty() {
        output.push_str(&format!("{}\n\n", meta.join(" | ")));
    }

    output
}

/// Format papers as a Title/Year/Cited table (top rows only).
#[must_use]
pub fn format_papers_table(papers: &[PaperRecord]) -> String {
    let mut output = String::from("| Title | Year | Cited |\n|:------|:-----|------:|\n");

    for paper in papers.iter().take(TABLE_ROWS) {
        let year = paper
            .publication_year
            .map_or_else(|| "N/A".to_string(), |y| y.to_string());
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            table_cell(&truncate(paper.title_or_default(), TITLE_WIDTH)),
            year,
            paper.citations()
        ));
    }

    output
}

/// Format the agent-enhanced half of a search.
#[must_use]
pub fn format_outcome_markdown(outcome: &AgentOutcome) -> String {
    let mut output = String::new();

    output.push_str(&format!("- **Strategy**: {}\n", outcome.choice.source));
    output.push_str(&format!(
        "- **Keyword**: `{}` -> `{}`\n",
        outcome.query, outcome.choice.keyword
    ));
    output.push_str(&format!("- **Fetched**: {} papers\n", outcome.fetched_total));

    if let Some(start) = outcome.plan.filters().year_start {
        output.push_str(&format!("- **Year filter**: >= {start}\n"));
    }
    if let Some(institution) = outcome.institution_note() {
        output.push_str(&format!(
            "- **Institution**: {institution} (shown only, results are not filtered by institution)\n"
        ));
    }

    if outcome.papers.is_empty() {
        output.push_str("\n> **Recommended**: no matching papers\n");
    } else {
        output.push_str(&format!(
            "\n> **Recommended**: {} papers (top {} shown)\n\n",
            outcome.papers.len(),
            TABLE_ROWS.min(outcome.papers.len())
        ));
        output.push_str(&format_papers_table(&outcome.papers));
    }

    output
}

/// Format a before/after comparison for one query.
#[must_use]
pub fn format_comparison_markdown(comparison: &Comparison) -> String {
    let mut output = format!("## Query: `{}`\n\n", comparison.outcome.query);

    output.push_str("### Before: raw query search\n\n");
    if comparison.baseline.total == 0 {
        output.push_str("> **Results**: 0 papers (search failed or nothing matched)\n");
    } else {
        output.push_str(&format!("> **Results**: {} papers\n\n", comparison.baseline.total));
        for (i, paper) in comparison.baseline.records.iter().take(BASELINE_PREVIEW).enumerate() {
            output.push_str(&format!("- {}. {}\n", i + 1, paper.title_or_default()));
        }
    }

    output.push_str("\n### After: agent-enhanced search\n\n");
    output.push_str(&format_plan_markdown(&comparison.outcome.plan));
    output.push_str(&format_outcome_markdown(&comparison.outcome));

    output
}

/// Format a full report over several comparisons.
#[must_use]
pub fn format_report_markdown(comparisons: &[Comparison]) -> String {
    let mut output = String::from("# Acemap Search Agent Report\n\n");
    output.push_str("Raw-query search compared with agent-enhanced search for each query.\n\n");

    for comparison in comparisons {
        output.push_str(&format_comparison_markdown(comparison));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format grounding evaluation rows as a status table.
#[must_use]
pub fn format_evaluation_markdown(rows: &[EvaluationRow]) -> String {
    let mut output = String::from(
        "| Status | Query | Raw keywords | Grounded keywords | Institution | From | Time (s) |\n\
         |:-------|:------|:-------------|:------------------|:------------|:-----|---------:|\n",
    );

    for row in rows {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {:.2} |\n",
            row.status(),
            table_cell(&row.query),
            table_cell(&row.raw_cell()),
            table_cell(&row.grounded_cell()),
            table_cell(row.institution.as_deref().unwrap_or("-")),
            row.year_start.map_or_else(|| "-".to_string(), |y| y.to_string()),
            row.elapsed.as_secs_f64()
        ));
    }

    let corrected = rows.iter().filter(|r| r.corrected()).count();
    output.push_str(&format!("\n{corrected} of {} queries corrected by grounding\n", rows.len()));

    output
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.iter().map(|k| format!("`{k}`")).collect::<Vec<_>>().join(", ")
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let head: String = text.chars().take(width).collect();
    format!("{head}...")
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
