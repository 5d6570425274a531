//! Term grounding against the knowledge-graph vocabulary.

pub mod fuzz;

use std::sync::Arc;

use crate::config::defaults;
use crate::vocabulary::VocabularyStore;

/// Best vocabulary candidate for a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// Canonical vocabulary entry.
    pub candidate: &'a str,
    /// Similarity (0-100).
    pub score: u8,
}

/// Corrects noisy terms to the closest canonical vocabulary entry.
///
/// Grounding never fails: with an empty vocabulary, a blank term, or no
/// candidate reaching the threshold, the term comes back unchanged.
/// Candidates are scanned in the vocabulary's lexical order and the first
/// maximum wins, so equal scores resolve to the lexically smallest entry.
#[derive(Debug, Clone)]
pub struct TermGrounder {
    vocabulary: Arc<VocabularyStore>,
    processed: Arc<[String]>,
    threshold: u8,
}

impl TermGrounder {
    /// Grounder with the default threshold of 85.
    #[must_use]
    pub fn new(vocabulary: Arc<VocabularyStore>) -> Self {
        Self::with_threshold(vocabulary, defaults::GROUNDING_THRESHOLD)
    }

    /// Grounder with a custom threshold (0-100).
    #[must_use]
    pub fn with_threshold(vocabulary: Arc<VocabularyStore>, threshold: u8) -> Self {
        let processed = vocabulary.iter().map(fuzz::full_process).collect();
        Self { vocabulary, processed, threshold }
    }

    /// Minimum score required to replace a term.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    /// The vocabulary being matched against.
    #[must_use]
    pub fn vocabulary(&self) -> &VocabularyStore {
        &self.vocabulary
    }

    /// Highest-scoring candidate regardless of threshold.
    #[must_use]
    pub fn best_match(&self, term: &str) -> Option<Match<'_>> {
        if self.vocabulary.is_empty() || term.trim().is_empty() {
            return None;
        }

        let query = fuzz::full_process(term);
        let mut best: Option<Match<'_>> = None;

        for (candidate, processed) in self.vocabulary.iter().zip(self.processed.iter()) {
            let score = fuzz::weighted_ratio_processed(&query, processed);
            if best.is_none_or(|b| score > b.score) {
                best = Some(Match { candidate, score });
                if score == 100 {
                    break;
                }
            }
        }

        best
    }

    /// Ground a single term.
    #[must_use]
    pub fn ground(&self, term: &str) -> String {
        match self.best_match(term) {
            Some(m) if m.score >= self.threshold => {
                if m.candidate != term {
                    tracing::debug!(term, grounded = m.candidate, score = m.score, "Grounded term");
                }
                m.candidate.to_string()
            }
            _ => term.to_string(),
        }
    }
}
