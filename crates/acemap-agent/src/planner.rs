//! Query planning: extraction followed by per-keyword grounding.

use crate::grounding::TermGrounder;
use crate::llm::IntentExtractor;
use crate::models::{Filters, RawIntent, SearchPlan};

/// Composes [`IntentExtractor`] and [`TermGrounder`] into a [`SearchPlan`].
///
/// Stateless per query. Neither stage can fail (both fall back), so there
/// is nothing to retry here.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    extractor: IntentExtractor,
    grounder: TermGrounder,
}

impl QueryPlanner {
    /// Create a planner.
    #[must_use]
    pub const fn new(extractor: IntentExtractor, grounder: TermGrounder) -> Self {
        Self { extractor, grounder }
    }

    /// The grounder used for keywords.
    #[must_use]
    pub const fn grounder(&self) -> &TermGrounder {
        &self.grounder
    }

    /// Plan a search for `query`.
    pub async fn plan(&self, query: &str) -> SearchPlan {
        let intent = self.extractor.extract(query).await;
        tracing::debug!(?intent, "Raw intent");
        self.ground_intent(&intent)
    }

    /// Ground an already extracted intent, keyword by keyword, in order.
    #[must_use]
    pub fn ground_intent(&self, intent: &RawIntent) -> SearchPlan {
        let pairs = intent.keywords.iter().map(|raw| (raw.clone(), self.grounder.ground(raw)));
        SearchPlan::new(pairs, Filters::from(intent))
    }
}
