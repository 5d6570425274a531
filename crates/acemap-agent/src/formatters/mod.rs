//! Output formatters for plans, outcomes, comparison reports and evaluations.

mod json;
mod markdown;

pub use json::{compact_paper, outcome_json, plan_json};
pub use markdown::{
    format_comparison_markdown, format_evaluation_markdown, format_outcome_markdown,
    format_papers_table, format_plan_markdown, format_report_markdown,
};
