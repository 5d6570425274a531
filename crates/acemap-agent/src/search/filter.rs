//! Client-side post-filtering of search results.

use crate::models::{Filters, PaperRecord};

/// Applies a plan's filters to a candidate list.
///
/// Only the `year_start` lower bound is enforced. Institution and author
/// are not: Acemap search results do not reliably carry them, so they stay
/// metadata for the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultFilter {
    year_start: Option<i32>,
}

impl ResultFilter {
    /// Filter with an explicit lower bound.
    #[must_use]
    pub const fn new(year_start: Option<i32>) -> Self {
        Self { year_start }
    }

    /// Filter for a plan's filters.
    #[must_use]
    pub const fn from_filters(filters: &Filters) -> Self {
        Self::new(filters.year_start)
    }

    /// Whether a single record survives.
    #[must_use]
    pub fn keeps(&self, record: &PaperRecord) -> bool {
        match self.year_start {
            None => true,
            Some(start) => record.publication_year.is_some_and(|year| year >= start),
        }
    }

    /// Stable filter: retained records keep their relative order.
    #[must_use]
    pub fn apply(&self, records: Vec<PaperRecord>) -> Vec<PaperRecord> {
        if self.year_start.is_none() {
            return records;
        }
        records.into_iter().filter(|r| self.keeps(r)).collect()
    }
}

/// Keep records published in or after `year_start`; `None` keeps everything.
///
/// Records without a usable year are dropped when a bound is set.
#[must_use]
pub fn filter_by_year(records: Vec<PaperRecord>, year_start: Option<i32>) -> Vec<PaperRecord> {
    ResultFilter::new(year_start).apply(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: Option<i32>) -> PaperRecord {
        PaperRecord {
            title: Some(title.to_string()),
            publication_year: year,
            ..PaperRecord::default()
        }
    }

    fn titles(records: &[PaperRecord]) -> Vec<&str> {
        records.iter().map(PaperRecord::title_or_default).collect()
    }

    #[test]
    fn test_lower_bound_drops_old_and_undated() {
        let records =
            vec![record("old", Some(2019)), record("new", Some(2023)), record("undated", None)];
        let kept = filter_by_year(records, Some(2020));
        assert_eq!(titles(&kept), vec!["new"]);
    }

    #[test]
    fn test_bound_is_inclusive() {
        let kept = filter_by_year(vec![record("edge", Some(2020))], Some(2020));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_no_bound_is_identity() {
        let records = vec![record("b", None), record("a", Some(1990)), record("c", Some(2024))];
        assert_eq!(filter_by_year(records.clone(), None), records);
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![
            record("first", Some(2024)),
            record("dropped", Some(2001)),
            record("second", Some(2021)),
            record("third", Some(2022)),
        ];
        let kept = filter_by_year(records, Some(2020));
        assert_eq!(titles(&kept), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_from_filters_ignores_institution() {
        let filters = Filters {
            institution: Some("Massachusetts Institute of Technology".into()),
            ..Filters::default()
        };
        let records = vec![record("any", Some(1999))];
        assert_eq!(ResultFilter::from_filters(&filters).apply(records.clone()), records);
    }

    #[test]
    fn test_fractional_year_kept_by_truncated_value() {
        let records: Vec<PaperRecord> = serde_json::from_value(serde_json::json!([
            {"title": "fractional", "publication_year": 2023.5},
            {"title": "just below", "publication_year": 2019.9}
        ]))
        .unwrap();
        let kept = filter_by_year(records, Some(2020));
        assert_eq!(titles(&kept), vec!["fractional"]);
    }
}
