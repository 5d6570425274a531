//! End-to-end search: plan, pick a keyword, search, post-filter.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{Config, defaults};
use crate::grounding::TermGrounder;
use crate::llm::{ChatCompletionClient, IntentExtractor};
use crate::models::{KeywordChoice, PaperRecord, SearchPage, SearchPlan};
use crate::planner::QueryPlanner;
use crate::search::{AcemapClient, PaperSearch, ResultFilter};
use crate::vocabulary::VocabularyStore;

/// Result of one agent-enhanced search.
#[derive(Debug, Clone, Serialize)]
pub struct AgentOutcome {
    /// The user query.
    pub query: String,
    /// Plan derived from the query.
    pub plan: SearchPlan,
    /// Keyword sent to the search service.
    pub choice: KeywordChoice,
    /// Total matches reported by the search service.
    pub fetched_total: u64,
    /// Records returned before filtering.
    pub fetched: usize,
    /// Records that passed the year filter, in ranked order.
    pub papers: Vec<PaperRecord>,
}

impl AgentOutcome {
    /// Institution recognized in the query. Reported, never filtered on.
    #[must_use]
    pub fn institution_note(&self) -> Option<&str> {
        self.plan.filters().institution.as_deref()
    }
}

/// Raw-query baseline next to the agent-enhanced search.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Search for the unprocessed query.
    pub baseline: SearchPage,
    /// Agent-enhanced search.
    pub outcome: AgentOutcome,
}

/// Query planner wired to a paper search.
#[derive(Clone)]
pub struct SearchAgent {
    planner: QueryPlanner,
    search: Arc<dyn PaperSearch>,
    search_limit: usize,
    baseline_limit: usize,
}

impl SearchAgent {
    /// Create an agent.
    #[must_use]
    pub fn new(planner: QueryPlanner, search: Arc<dyn PaperSearch>) -> Self {
        Self {
            planner,
            search,
            search_limit: defaults::SEARCH_LIMIT,
            baseline_limit: defaults::BASELINE_LIMIT,
        }
    }

    /// Override the number of papers fetched per search.
    #[must_use]
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Build the production agent: loads the vocabulary once and wires the
    /// completion and Acemap clients.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built. A missing vocabulary
    /// is not an error.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let vocabulary = Arc::new(VocabularyStore::load(&config.vocab_path));
        let grounder = TermGrounder::with_threshold(vocabulary, config.grounding_threshold);

        let completion = Arc::new(ChatCompletionClient::new(config)?);
        let extractor = IntentExtractor::with_recent_year_floor(completion, config.recent_year_floor);

        let search = Arc::new(AcemapClient::new(config)?);

        Ok(Self::new(QueryPlanner::new(extractor, grounder), search)
            .with_search_limit(config.search_limit))
    }

    /// The planner used for each query.
    #[must_use]
    pub const fn planner(&self) -> &QueryPlanner {
        &self.planner
    }

    /// Plan `query`, search the selected keyword and apply the year filter.
    pub async fn run(&self, query: &str) -> AgentOutcome {
        let plan = self.planner.plan(query).await;
        let choice = plan.select_keyword(query);

        tracing::info!(
            query,
            keyword = %choice.keyword,
            source = %choice.source,
            "Searching"
        );

        let page = self.search.search_or_empty(&choice.keyword, self.search_limit).await;
        let fetched = page.records.len();
        let papers = ResultFilter::from_filters(plan.filters()).apply(page.records);

        AgentOutcome {
            query: query.to_string(),
            plan,
            choice,
            fetched_total: page.total,
            fetched,
            papers,
        }
    }

    /// Search the raw query as a baseline, then run the agent.
    pub async fn compare(&self, query: &str) -> Comparison {
        let baseline = self.search.search_or_empty(query, self.baseline_limit).await;
        let outcome = self.run(query).await;
        Comparison { baseline, outcome }
    }
}

impl std::fmt::Debug for SearchAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAgent")
            .field("planner", &self.planner)
            .field("search_limit", &self.search_limit)
            .field("baseline_limit", &self.baseline_limit)
            .finish_non_exhaustive()
    }
}
