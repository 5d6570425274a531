//! Free text to [`RawIntent`] via the completion collaborator.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::client::CompletionClient;
use super::prompt;
use crate::config::defaults;
use crate::models::RawIntent;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("valid code fence regex"));

/// Longest slice of raw model output echoed into logs.
const LOG_PREVIEW_CHARS: usize = 500;

/// Extracts a coarse structured intent from a user query.
///
/// Extraction never fails. A transport error, a non-success status, or a
/// reply that is not a JSON object all produce [`RawIntent::fallback`],
/// where the whole query becomes the only keyword.
#[derive(Clone)]
pub struct IntentExtractor {
    client: Arc<dyn CompletionClient>,
    recent_year_floor: i32,
}

impl IntentExtractor {
    /// Extractor with the default recency floor.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_recent_year_floor(client, defaults::RECENT_YEAR_FLOOR)
    }

    /// Extractor that maps "recent"/"latest" to `recent_year_floor`.
    #[must_use]
    pub fn with_recent_year_floor(client: Arc<dyn CompletionClient>, recent_year_floor: i32) -> Self {
        Self { client, recent_year_floor }
    }

    /// Prompt sent for `query`.
    #[must_use]
    pub fn prompt(&self, query: &str) -> String {
        prompt::render(query, self.recent_year_floor)
    }

    /// Extract the intent of `query`.
    pub async fn extract(&self, query: &str) -> RawIntent {
        match self.client.complete(&self.prompt(query)).await {
            Ok(content) => parse_response(query, &content),
            Err(e) => {
                tracing::warn!(error = %e, "Completion call failed, using query as keyword");
                RawIntent::fallback(query)
            }
        }
    }
}

impl std::fmt::Debug for IntentExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentExtractor")
            .field("recent_year_floor", &self.recent_year_floor)
            .finish_non_exhaustive()
    }
}

/// Remove Markdown code-fence markers and surrounding whitespace.
#[must_use]
pub fn strip_code_fences(content: &str) -> String {
    CODE_FENCE.replace_all(content, "").trim().to_string()
}

/// Parse raw model output for `query`, falling back when it is not a JSON object.
#[must_use]
pub fn parse_response(query: &str, content: &str) -> RawIntent {
    let cleaned = strip_code_fences(content);

    if let Some(intent) = RawIntent::from_json(&cleaned) {
        tracing::debug!(?intent, "Extracted intent");
        return intent;
    }

    let preview: String = content.chars().take(LOG_PREVIEW_CHARS).collect();
    tracing::warn!(raw = %preview, "Completion was not a JSON object, using query as keyword");
    RawIntent::fallback(query)
}
