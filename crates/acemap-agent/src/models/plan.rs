//! Normalized search plan handed to the search collaborator.

use serde::Serialize;

use super::RawIntent;

/// Filters copied verbatim from the raw intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filters {
    /// Institution (metadata only, never applied as a hard filter).
    pub institution: Option<String>,

    /// Author name.
    pub author: Option<String>,

    /// Earliest publication year.
    pub year_start: Option<i32>,

    /// Latest publication year.
    pub year_end: Option<i32>,
}

impl From<&RawIntent> for Filters {
    fn from(intent: &RawIntent) -> Self {
        Self {
            institution: intent.institution.clone(),
            author: intent.author.clone(),
            year_start: intent.year_start,
            year_end: intent.year_end,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
struct SearchParams {
    keywords_raw: Vec<String>,
    keywords_grounded: Vec<String>,
}

/// Grounding-applied parameter set for one query.
///
/// `keywords_grounded[i]` is always the grounding of `keywords_raw[i]`;
/// the two lists are built together and cannot be changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchPlan {
    search_params: SearchParams,
    filters: Filters,
}

impl SearchPlan {
    /// Build a plan from `(raw, grounded)` keyword pairs.
    #[must_use]
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>, filters: Filters) -> Self {
        let (keywords_raw, keywords_grounded) = pairs.into_iter().unzip();
        Self { search_params: SearchParams { keywords_raw, keywords_grounded }, filters }
    }

    /// Keywords as extracted, in extraction order.
    #[must_use]
    pub fn keywords_raw(&self) -> &[String] {
        &self.search_params.keywords_raw
    }

    /// Grounded keywords, index-aligned with [`Self::keywords_raw`].
    #[must_use]
    pub fn keywords_grounded(&self) -> &[String] {
        &self.search_params.keywords_grounded
    }

    /// Filters from the raw intent.
    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Iterate `(raw, grounded)` pairs whose grounding changed the term.
    pub fn corrections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords_raw()
            .iter()
            .zip(self.keywords_grounded())
            .filter(|(raw, grounded)| raw != grounded)
            .map(|(raw, grounded)| (raw.as_str(), grounded.as_str()))
    }

    /// Pick the keyword sent to the search service.
    ///
    /// First grounded keyword, else first raw keyword, else the original query.
    #[must_use]
    pub fn select_keyword(&self, query: &str) -> KeywordChoice {
        if let Some(keyword) = self.keywords_grounded().first() {
            KeywordChoice { keyword: keyword.clone(), source: KeywordSource::Grounded }
        } else if let Some(keyword) = self.keywords_raw().first() {
            KeywordChoice { keyword: keyword.clone(), source: KeywordSource::Extracted }
        } else {
            KeywordChoice { keyword: query.to_string(), source: KeywordSource::OriginalQuery }
        }
    }
}

/// Where the selected search keyword came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    /// First grounded keyword.
    Grounded,
    /// First extracted keyword (grounded list empty).
    Extracted,
    /// The unprocessed query string.
    OriginalQuery,
}

impl KeywordSource {
    /// Human-readable strategy label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grounded => "KG grounding",
            Self::Extracted => "LLM extraction",
            Self::OriginalQuery => "original query",
        }
    }
}

impl std::fmt::Display for KeywordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword chosen for the search call and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordChoice {
    /// Keyword sent to the search service.
    pub keyword: String,
    /// Selection tier.
    pub source: KeywordSource,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(r, g)| ((*r).to_string(), (*g).to_string())).collect()
    }

    #[test]
    fn test_lists_stay_aligned() {
        let plan = SearchPlan::new(pairs(&[("Grnite", "Granite"), ("MORB", "MORB")]), Filters::default());
        assert_eq!(plan.keywords_raw(), ["Grnite", "MORB"]);
        assert_eq!(plan.keywords_grounded(), ["Granite", "MORB"]);
    }

    #[test]
    fn test_select_prefers_grounded() {
        let plan = SearchPlan::new(pairs(&[("Grnite", "Granite")]), Filters::default());
        let choice = plan.select_keyword("recent papers about Grnite");
        assert_eq!(choice.keyword, "Granite");
        assert_eq!(choice.source, KeywordSource::Grounded);
    }

    #[test]
    fn test_select_falls_back_to_query() {
        let plan = SearchPlan::new(Vec::new(), Filters::default());
        let choice = plan.select_keyword("帮我找关于板块构造的论文");
        assert_eq!(choice.keyword, "帮我找关于板块构造的论文");
        assert_eq!(choice.source, KeywordSource::OriginalQuery);
    }

    #[test]
    fn test_corrections_only_lists_changes() {
        let plan = SearchPlan::new(
            pairs(&[("Grnite", "Granite"), ("basalt", "basalt"), ("Bsallt", "Basalt")]),
            Filters::default(),
        );
        let corrections: Vec<_> = plan.corrections().collect();
        assert_eq!(corrections, vec![("Grnite", "Granite"), ("Bsallt", "Basalt")]);
    }

    #[test]
    fn test_serialized_shape() {
        let filters = Filters { year_start: Some(2020), ..Filters::default() };
        let plan = SearchPlan::new(pairs(&[("Grnite", "Granite")]), filters);
        let value = serde_json::to_value(&plan).unwrap();

        assert_eq!(
            value,
            json!({
                "search_params": {
                    "keywords_raw": ["Grnite"],
                    "keywords_grounded": ["Granite"]
                },
                "filters": {
                    "institution": null,
                    "author": null,
                    "year_start": 2020,
                    "year_end": null
                }
            })
        );
    }

    #[test]
    fn test_filters_copied_from_intent() {
        let intent = RawIntent {
            keywords: vec!["granite".into()],
            institution: Some("Chinese Academy of Sciences".into()),
            author: Some("John Smith".into()),
            year_start: Some(2015),
            year_end: Some(2020),
        };
        let filters = Filters::from(&intent);
        assert_eq!(filters.institution.as_deref(), Some("Chinese Academy of Sciences"));
        assert_eq!(filters.author.as_deref(), Some("John Smith"));
        assert_eq!(filters.year_start, Some(2015));
        assert_eq!(filters.year_end, Some(2020));
    }
}
