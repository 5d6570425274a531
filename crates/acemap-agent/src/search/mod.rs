//! Search collaborator and client-side result filtering.

mod acemap;
mod filter;

pub use acemap::AcemapClient;
pub use filter::{ResultFilter, filter_by_year};

use crate::error::ClientResult;
use crate::models::SearchPage;

/// A ranked paper search: keyword and result count in, records out.
#[async_trait::async_trait]
pub trait PaperSearch: Send + Sync {
    /// Search for `keyword`, returning at most `limit` records.
    async fn search(&self, keyword: &str, limit: usize) -> ClientResult<SearchPage>;

    /// [`Self::search`] with every failure mapped to an empty page.
    ///
    /// Callers cannot tell "no results" from "search failed".
    async fn search_or_empty(&self, keyword: &str, limit: usize) -> SearchPage {
        match self.search(keyword, limit).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(keyword, error = %e, "Search failed, returning no results");
                SearchPage::empty()
            }
        }
    }
}
